use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::{daily_logs, settings};
use crate::history;
use crate::identity::CurrentUser;
use crate::models::daily_log::DailyLog;
use crate::models::entry::{Entry, EntryStatus};
use crate::models::habit::{Habit, HabitIcon, Period, RoutineType};
use crate::models::settings::UserSetting;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub date: NaiveDate,
    pub habits: Vec<DashboardHabit>,
    #[serde(rename = "dailyLog")]
    pub daily_log: DailyLog,
    pub settings: UserSetting,
}

/// One habit card: the stored row merged with the reference date's entry
/// and the projected history window.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardHabit {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub period: Period,
    pub routine_type: RoutineType,
    pub time: Option<String>,
    pub is_time_mode: bool,
    pub icon: HabitIcon,
    pub status: EntryStatus,
    pub note: String,
    pub history: Vec<u8>,
}

/// Aggregates everything the client renders for one day: non-archived
/// habits with their projected windows, the day's reflection log, and the
/// user's settings. The log and settings rows are lazily created with
/// their documented defaults; that is the only write this read performs.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let window_start = history::window_start(date, history::HISTORY_WINDOW);

    let habits = sqlx::query_as::<_, Habit>(
        "SELECT * FROM habits WHERE user_id = ?1 AND is_archived = 0 ORDER BY id ASC",
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    // One range query covers every habit's window
    let entries = sqlx::query_as::<_, Entry>(
        r#"
        SELECT habit_entries.* FROM habit_entries
        JOIN habits ON habits.id = habit_entries.habit_id
        WHERE habits.user_id = ?1 AND habit_entries.date BETWEEN ?2 AND ?3
        "#,
    )
    .bind(user.id)
    .bind(window_start)
    .bind(date)
    .fetch_all(&state.db)
    .await?;

    let mut entries_by_habit: HashMap<i64, HashMap<NaiveDate, Entry>> = HashMap::new();
    for entry in entries {
        entries_by_habit
            .entry(entry.habit_id)
            .or_default()
            .insert(entry.date, entry);
    }

    let empty = HashMap::new();
    let mut cards = Vec::with_capacity(habits.len());
    for habit in habits {
        let dated = entries_by_habit.get(&habit.id).unwrap_or(&empty);
        let current = dated.get(&date);

        cards.push(DashboardHabit {
            id: habit.id,
            title: habit.title,
            description: habit.description,
            period: habit.period,
            routine_type: habit.routine_type,
            time: habit.time_value,
            is_time_mode: habit.is_time_mode,
            icon: habit.icon,
            status: current.map(|e| e.status.clone()).unwrap_or_default(),
            note: current.and_then(|e| e.note.clone()).unwrap_or_default(),
            history: history::project(dated, date, history::HISTORY_WINDOW),
        });
    }

    let daily_log = daily_logs::get_or_create_log(&state.db, user.id, date).await?;
    let user_settings = settings::get_or_create_settings(&state.db, user.id).await?;

    Ok(Json(DashboardResponse {
        date,
        habits: cards,
        daily_log,
        settings: user_settings,
    }))
}
