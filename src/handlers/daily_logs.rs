use axum::{extract::State, Extension, Json};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::identity::CurrentUser;
use crate::models::daily_log::{DailyLog, UpsertDailyLogRequest};
use crate::AppState;

/// Merge-upserts the caller's reflection for a date. Fields absent from
/// the body keep their stored value, so a debounced gratitude write and a
/// mood click for the same date cannot clobber each other.
pub async fn upsert_daily_log(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<UpsertDailyLogRequest>,
) -> AppResult<Json<DailyLog>> {
    let log = sqlx::query_as::<_, DailyLog>(
        r#"
        INSERT INTO daily_logs (user_id, date, mood, gratitude, created_at, updated_at)
        VALUES (?1, ?2, ?3, COALESCE(?4, ''), ?5, ?5)
        ON CONFLICT (user_id, date) DO UPDATE SET
            mood = COALESCE(?3, daily_logs.mood),
            gratitude = COALESCE(?4, daily_logs.gratitude),
            updated_at = ?5
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(body.date)
    .bind(&body.mood)
    .bind(&body.gratitude)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    Ok(Json(log))
}

/// The single lazy-create path for daily logs: inserts the documented
/// defaults (mood unset, gratitude empty) if no row exists, then returns
/// the stored row. Idempotent via the (user_id, date) uniqueness
/// constraint, so concurrent dashboard reads cannot create duplicates.
pub async fn get_or_create_log(db: &SqlitePool, user_id: i64, date: NaiveDate) -> AppResult<DailyLog> {
    sqlx::query(
        r#"
        INSERT INTO daily_logs (user_id, date, mood, gratitude, created_at, updated_at)
        VALUES (?1, ?2, NULL, '', ?3, ?3)
        ON CONFLICT (user_id, date) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(Utc::now())
    .execute(db)
    .await?;

    let log = sqlx::query_as::<_, DailyLog>("SELECT * FROM daily_logs WHERE user_id = ?1 AND date = ?2")
        .bind(user_id)
        .bind(date)
        .fetch_one(db)
        .await?;

    Ok(log)
}
