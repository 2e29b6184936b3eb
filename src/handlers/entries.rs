use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::identity::CurrentUser;
use crate::models::entry::{Entry, EntryStatus, SetNoteRequest, ToggleEntryRequest};
use crate::models::habit::Habit;
use crate::AppState;

/// Sets the status of one (habit, date) cell. Idempotent: the upsert is a
/// single atomic statement keyed on the (habit_id, date) uniqueness
/// constraint, so racing calls cannot produce duplicate rows.
/// `completed_at` is stamped when the new status is `completed` and
/// cleared for any other status, on every call.
pub async fn toggle_entry(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<ToggleEntryRequest>,
) -> AppResult<Json<Entry>> {
    require_active_habit(&state, user.id, body.habit_id).await?;

    let now = Utc::now();
    let completed_at = if body.status == EntryStatus::Completed {
        Some(now)
    } else {
        None
    };

    let entry = sqlx::query_as::<_, Entry>(
        r#"
        INSERT INTO habit_entries (habit_id, date, status, completed_at, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        ON CONFLICT (habit_id, date) DO UPDATE SET
            status = excluded.status,
            completed_at = excluded.completed_at,
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(body.habit_id)
    .bind(body.date)
    .bind(&body.status)
    .bind(completed_at)
    .bind(now)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(entry))
}

/// Sets the note of one (habit, date) cell. Touches only `note`, never
/// `status` or `completed_at`, so a racing toggle cannot be clobbered.
pub async fn set_note(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<SetNoteRequest>,
) -> AppResult<Json<Entry>> {
    require_active_habit(&state, user.id, body.habit_id).await?;

    let entry = sqlx::query_as::<_, Entry>(
        r#"
        INSERT INTO habit_entries (habit_id, date, note, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?4)
        ON CONFLICT (habit_id, date) DO UPDATE SET
            note = excluded.note,
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(body.habit_id)
    .bind(body.date)
    .bind(&body.note)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    Ok(Json(entry))
}

async fn require_active_habit(state: &AppState, user_id: i64, habit_id: i64) -> AppResult<()> {
    let _habit = sqlx::query_as::<_, Habit>(
        "SELECT * FROM habits WHERE id = ?1 AND user_id = ?2 AND is_archived = 0",
    )
    .bind(habit_id)
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Habit not found".into()))?;

    Ok(())
}
