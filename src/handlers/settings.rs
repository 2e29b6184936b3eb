use axum::{extract::State, Extension, Json};
use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::identity::CurrentUser;
use crate::models::settings::{UpdateSettingsRequest, UserSetting};
use crate::AppState;

pub async fn update_settings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<UpdateSettingsRequest>,
) -> AppResult<Json<UserSetting>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let settings = sqlx::query_as::<_, UserSetting>(
        r#"
        INSERT INTO user_settings (user_id, weekly_intention, preferred_view, start_of_day_hour, created_at, updated_at)
        VALUES (?1, ?2, COALESCE(?3, 'routine'), COALESCE(?4, 0), ?5, ?5)
        ON CONFLICT (user_id) DO UPDATE SET
            weekly_intention = COALESCE(?2, user_settings.weekly_intention),
            preferred_view = COALESCE(?3, user_settings.preferred_view),
            start_of_day_hour = COALESCE(?4, user_settings.start_of_day_hour),
            updated_at = ?5
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(&body.weekly_intention)
    .bind(&body.preferred_view)
    .bind(body.start_of_day_hour)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    Ok(Json(settings))
}

/// The single lazy-create path for settings: one row per user with the
/// column defaults, created on first dashboard read. Idempotent via the
/// user_id uniqueness constraint.
pub async fn get_or_create_settings(db: &SqlitePool, user_id: i64) -> AppResult<UserSetting> {
    sqlx::query(
        r#"
        INSERT INTO user_settings (user_id, created_at, updated_at)
        VALUES (?1, ?2, ?2)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(Utc::now())
    .execute(db)
    .await?;

    let settings = sqlx::query_as::<_, UserSetting>("SELECT * FROM user_settings WHERE user_id = ?1")
        .bind(user_id)
        .fetch_one(db)
        .await?;

    Ok(settings)
}
