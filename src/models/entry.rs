use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One habit's record for one calendar date. Created lazily — a missing
/// row for a date means implicit `pending`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: i64,
    pub habit_id: i64,
    pub date: NaiveDate,
    pub status: EntryStatus,
    pub note: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Completed,
    Skipped,
}

impl Default for EntryStatus {
    fn default() -> Self {
        Self::Pending
    }
}

#[derive(Debug, Deserialize)]
pub struct ToggleEntryRequest {
    pub habit_id: i64,
    pub date: NaiveDate,
    pub status: EntryStatus,
}

#[derive(Debug, Deserialize)]
pub struct SetNoteRequest {
    pub habit_id: i64,
    pub date: NaiveDate,
    pub note: Option<String>,
}
