use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::identity::CurrentUser;
use crate::models::habit::{CreateHabitRequest, Habit, UpdateHabitRequest};
use crate::AppState;

pub async fn create_habit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateHabitRequest>,
) -> AppResult<(StatusCode, Json<Habit>)> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let now = Utc::now();
    let habit = sqlx::query_as::<_, Habit>(
        r#"
        INSERT INTO habits (user_id, title, description, icon, period, routine_type, is_time_mode, time_value, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(&body.title)
    .bind(&body.description)
    .bind(&body.icon)
    .bind(&body.period)
    .bind(&body.routine_type)
    .bind(body.is_time_mode)
    .bind(&body.time)
    .bind(now)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(habit_id): Path<i64>,
    Json(body): Json<UpdateHabitRequest>,
) -> AppResult<Json<Habit>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // Verify ownership
    let _existing = sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE id = ?1 AND user_id = ?2")
        .bind(habit_id)
        .bind(user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("Habit not found".into()))?;

    let habit = sqlx::query_as::<_, Habit>(
        r#"
        UPDATE habits SET
            title = COALESCE(?3, title),
            description = COALESCE(?4, description),
            period = COALESCE(?5, period),
            routine_type = COALESCE(?6, routine_type),
            is_time_mode = COALESCE(?7, is_time_mode),
            time_value = COALESCE(?8, time_value),
            icon = COALESCE(?9, icon),
            is_archived = COALESCE(?10, is_archived),
            updated_at = ?11
        WHERE id = ?1 AND user_id = ?2
        RETURNING *
        "#,
    )
    .bind(habit_id)
    .bind(user.id)
    .bind(&body.title)
    .bind(&body.description)
    .bind(&body.period)
    .bind(&body.routine_type)
    .bind(body.is_time_mode)
    .bind(&body.time)
    .bind(&body.icon)
    .bind(body.is_archived)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(habit_id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM habits WHERE id = ?1 AND user_id = ?2")
        .bind(habit_id)
        .bind(user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Habit not found".into()));
    }

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
