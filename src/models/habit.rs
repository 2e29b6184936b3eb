use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Habit {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub icon: HabitIcon,
    pub period: Period,
    pub routine_type: RoutineType,
    pub is_time_mode: bool,
    pub time_value: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Afternoon,
    Evening,
}

impl Default for Period {
    fn default() -> Self {
        Self::Morning
    }
}

/// Descriptive label only — no scheduling logic keys off it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq)]
pub enum RoutineType {
    Daily,
    Weekly,
    #[sqlx(rename = "One-time")]
    #[serde(rename = "One-time")]
    OneTime,
}

impl Default for RoutineType {
    fn default() -> Self {
        Self::Daily
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HabitIcon {
    Sun,
    Moon,
    Book,
    Coffee,
    Drop,
    Leaf,
}

impl Default for HabitIcon {
    fn default() -> Self {
        Self::Sun
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub period: Period,
    pub routine_type: RoutineType,
    #[serde(default)]
    pub is_time_mode: bool,
    /// Clock time when `is_time_mode`, otherwise a free-text duration/goal.
    pub time: Option<String>,
    pub icon: HabitIcon,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub period: Option<Period>,
    pub routine_type: Option<RoutineType>,
    pub is_time_mode: Option<bool>,
    pub time: Option<String>,
    pub icon: Option<HabitIcon>,
    pub is_archived: Option<bool>,
}
