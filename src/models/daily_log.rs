use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-user, per-date reflection record (mood + gratitude).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyLog {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub mood: Option<Mood>,
    pub gratitude: String,
    pub reflection: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Sun,
    Cloud,
    Rain,
}

#[derive(Debug, Deserialize)]
pub struct UpsertDailyLogRequest {
    pub date: NaiveDate,
    pub mood: Option<Mood>,
    pub gratitude: Option<String>,
}
