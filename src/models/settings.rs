use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Singleton-per-user preferences. `start_of_day_hour` is stored and
/// returned but never consulted by day-boundary logic.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSetting {
    pub id: i64,
    pub user_id: i64,
    pub weekly_intention: Option<String>,
    pub preferred_view: PreferredView,
    pub start_of_day_hour: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PreferredView {
    Routine,
    Grid,
}

impl Default for PreferredView {
    fn default() -> Self {
        Self::Routine
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    pub weekly_intention: Option<String>,
    pub preferred_view: Option<PreferredView>,
    #[validate(range(min = 0, max = 23, message = "start_of_day_hour must be between 0 and 23"))]
    pub start_of_day_hour: Option<i32>,
}
