use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use tend_api::config::Config;
use tend_api::{router, AppState};

fn app(pool: SqlitePool) -> Router {
    let config = Config {
        database_url: String::new(),
        host: "127.0.0.1".into(),
        port: 0,
        frontend_url: "http://localhost:3000".into(),
    };
    router(AppState {
        db: pool,
        config: Arc::new(config),
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    // Extractor rejections come back as plain text, not JSON
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create_habit(app: &Router, title: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/habits",
        Some(json!({
            "title": title,
            "period": "morning",
            "routineType": "Daily",
            "isTimeMode": false,
            "time": "500ml",
            "icon": "drop",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn toggle(app: &Router, habit_id: i64, date: &str, status: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/entries/toggle",
        Some(json!({ "habit_id": habit_id, "date": date, "status": status })),
    )
    .await
}

async fn dashboard(app: &Router, date: &str) -> Value {
    let (status, body) = send(app, "GET", &format!("/dashboard?date={date}"), None).await;
    assert_eq!(status, StatusCode::OK);
    body
}

fn habit_card<'a>(dashboard: &'a Value, habit_id: i64) -> &'a Value {
    dashboard["habits"]
        .as_array()
        .unwrap()
        .iter()
        .find(|h| h["id"].as_i64() == Some(habit_id))
        .expect("habit missing from dashboard")
}

#[sqlx::test]
async fn health_endpoints_respond(pool: SqlitePool) {
    let app = app(pool);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "tend-api");

    let (status, body) = send(&app, "GET", "/readyz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "ok");
}

#[sqlx::test]
async fn dashboard_shows_new_habit_with_defaults(pool: SqlitePool) {
    let app = app(pool);
    let habit_id = create_habit(&app, "Hydrate").await;

    let body = dashboard(&app, "2024-06-10").await;
    assert_eq!(body["date"], "2024-06-10");

    let card = habit_card(&body, habit_id);
    assert_eq!(card["title"], "Hydrate");
    assert_eq!(card["period"], "morning");
    assert_eq!(card["routineType"], "Daily");
    assert_eq!(card["isTimeMode"], false);
    assert_eq!(card["time"], "500ml");
    assert_eq!(card["icon"], "drop");
    assert_eq!(card["status"], "pending");
    assert_eq!(card["note"], "");
    assert_eq!(card["history"], json!(vec![0; 14]));

    assert_eq!(body["dailyLog"]["mood"], Value::Null);
    assert_eq!(body["dailyLog"]["gratitude"], "");
    assert_eq!(body["settings"]["preferred_view"], "routine");
    assert_eq!(body["settings"]["start_of_day_hour"], 0);
}

#[sqlx::test]
async fn toggle_completes_and_reverts_the_last_history_cell(pool: SqlitePool) {
    let app = app(pool);
    let habit_id = create_habit(&app, "Hydrate").await;

    let (status, entry) = toggle(&app, habit_id, "2024-06-10", "completed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["status"], "completed");
    assert!(entry["completed_at"].is_string());

    let body = dashboard(&app, "2024-06-10").await;
    let card = habit_card(&body, habit_id);
    assert_eq!(card["status"], "completed");
    assert_eq!(card["history"][13], 1);

    let (status, entry) = toggle(&app, habit_id, "2024-06-10", "pending").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["status"], "pending");
    assert_eq!(entry["completed_at"], Value::Null);

    let body = dashboard(&app, "2024-06-10").await;
    let card = habit_card(&body, habit_id);
    assert_eq!(card["status"], "pending");
    assert_eq!(card["history"][13], 0);
}

#[sqlx::test]
async fn toggle_is_idempotent(pool: SqlitePool) {
    let app = app(pool.clone());
    let habit_id = create_habit(&app, "Hydrate").await;

    let (_, first) = toggle(&app, habit_id, "2024-06-10", "completed").await;
    let (_, second) = toggle(&app, habit_id, "2024-06-10", "completed").await;
    let (_, third) = toggle(&app, habit_id, "2024-06-10", "completed").await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["id"], third["id"]);
    assert_eq!(third["status"], "completed");

    let rows = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM habit_entries WHERE habit_id = ?1 AND date = ?2",
    )
    .bind(habit_id)
    .bind("2024-06-10")
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test]
async fn retroactive_toggle_hits_exactly_the_mapped_cell(pool: SqlitePool) {
    let app = app(pool);
    let habit_id = create_habit(&app, "Hydrate").await;

    // Cell 4 of a window anchored at 2024-06-10 is 2024-06-01
    let (status, _) = toggle(&app, habit_id, "2024-06-01", "completed").await;
    assert_eq!(status, StatusCode::OK);

    let body = dashboard(&app, "2024-06-10").await;
    let card = habit_card(&body, habit_id);
    let history = card["history"].as_array().unwrap();
    assert_eq!(history.len(), 14);
    assert_eq!(history[4], 1);
    assert_eq!(
        history.iter().filter(|bit| **bit == json!(1)).count(),
        1,
        "exactly one cell set"
    );
    assert_eq!(card["status"], "pending");
}

#[sqlx::test]
async fn note_survives_toggle(pool: SqlitePool) {
    let app = app(pool);
    let habit_id = create_habit(&app, "Hydrate").await;

    let (status, entry) = send(
        &app,
        "POST",
        "/entries/note",
        Some(json!({ "habit_id": habit_id, "date": "2024-06-10", "note": "extra glass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["note"], "extra glass");
    assert_eq!(entry["status"], "pending");

    let body = dashboard(&app, "2024-06-10").await;
    assert_eq!(habit_card(&body, habit_id)["note"], "extra glass");

    let (_, entry) = toggle(&app, habit_id, "2024-06-10", "completed").await;
    assert_eq!(entry["note"], "extra glass");
    assert_eq!(entry["status"], "completed");

    let body = dashboard(&app, "2024-06-10").await;
    let card = habit_card(&body, habit_id);
    assert_eq!(card["note"], "extra glass");
    assert_eq!(card["status"], "completed");
}

#[sqlx::test]
async fn note_upsert_does_not_touch_status(pool: SqlitePool) {
    let app = app(pool);
    let habit_id = create_habit(&app, "Hydrate").await;

    toggle(&app, habit_id, "2024-06-10", "completed").await;

    let (_, entry) = send(
        &app,
        "POST",
        "/entries/note",
        Some(json!({ "habit_id": habit_id, "date": "2024-06-10", "note": "after lunch" })),
    )
    .await;
    assert_eq!(entry["status"], "completed");
    assert!(entry["completed_at"].is_string());

    // A null note clears it without touching status either
    let (_, entry) = send(
        &app,
        "POST",
        "/entries/note",
        Some(json!({ "habit_id": habit_id, "date": "2024-06-10", "note": null })),
    )
    .await;
    assert_eq!(entry["note"], Value::Null);
    assert_eq!(entry["status"], "completed");
}

#[sqlx::test]
async fn unknown_or_archived_habits_are_not_found(pool: SqlitePool) {
    let app = app(pool);

    let (status, body) = toggle(&app, 9999, "2024-06-10", "completed").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 404);

    let habit_id = create_habit(&app, "Hydrate").await;
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/habits/{habit_id}"),
        Some(json!({ "isArchived": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_archived"], true);

    let (status, _) = toggle(&app, habit_id, "2024-06-10", "completed").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/entries/note",
        Some(json!({ "habit_id": habit_id, "date": "2024-06-10", "note": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn invalid_payloads_are_rejected(pool: SqlitePool) {
    let app = app(pool);
    let habit_id = create_habit(&app, "Hydrate").await;

    // Unknown status value
    let (status, _) = toggle(&app, habit_id, "2024-06-10", "done").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Unparseable date in a JSON body
    let (status, _) = toggle(&app, habit_id, "not-a-date", "completed").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Empty title
    let (status, body) = send(
        &app,
        "POST",
        "/habits",
        Some(json!({
            "title": "",
            "period": "morning",
            "routineType": "Daily",
            "icon": "sun",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["message"].is_string());

    // Unknown icon
    let (status, _) = send(
        &app,
        "POST",
        "/habits",
        Some(json!({
            "title": "Stretch",
            "period": "morning",
            "routineType": "Daily",
            "icon": "rocket",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Unparseable date in the query string
    let (status, _) = send(&app, "GET", "/dashboard?date=junk", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn daily_log_round_trip_and_per_date_isolation(pool: SqlitePool) {
    let app = app(pool);

    let (status, log) = send(
        &app,
        "POST",
        "/dailylog",
        Some(json!({ "date": "2024-06-10", "mood": "sun", "gratitude": "Good coffee" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log["mood"], "sun");
    assert_eq!(log["gratitude"], "Good coffee");

    let body = dashboard(&app, "2024-06-10").await;
    assert_eq!(body["dailyLog"]["mood"], "sun");
    assert_eq!(body["dailyLog"]["gratitude"], "Good coffee");

    let body = dashboard(&app, "2024-06-11").await;
    assert_eq!(body["dailyLog"]["mood"], Value::Null);
    assert_eq!(body["dailyLog"]["gratitude"], "");
}

#[sqlx::test]
async fn daily_log_merges_partial_updates(pool: SqlitePool) {
    let app = app(pool);

    send(
        &app,
        "POST",
        "/dailylog",
        Some(json!({ "date": "2024-06-10", "mood": "sun", "gratitude": "Good coffee" })),
    )
    .await;

    let (_, log) = send(
        &app,
        "POST",
        "/dailylog",
        Some(json!({ "date": "2024-06-10", "mood": "rain" })),
    )
    .await;
    assert_eq!(log["mood"], "rain");
    assert_eq!(log["gratitude"], "Good coffee");

    let (_, log) = send(
        &app,
        "POST",
        "/dailylog",
        Some(json!({ "date": "2024-06-10", "gratitude": "Quiet morning" })),
    )
    .await;
    assert_eq!(log["mood"], "rain");
    assert_eq!(log["gratitude"], "Quiet morning");
}

#[sqlx::test]
async fn dashboard_lazily_creates_log_and_settings_once(pool: SqlitePool) {
    let app = app(pool.clone());

    dashboard(&app, "2024-06-10").await;
    dashboard(&app, "2024-06-10").await;
    dashboard(&app, "2024-06-10").await;

    let logs = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM daily_logs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(logs, 1);

    let settings = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_settings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(settings, 1);

    // A different date gets its own log but reuses the settings row
    dashboard(&app, "2024-06-11").await;
    let logs = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM daily_logs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(logs, 2);
    let settings = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_settings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(settings, 1);
}

#[sqlx::test]
async fn delete_cascades_entries(pool: SqlitePool) {
    let app = app(pool.clone());
    let habit_id = create_habit(&app, "Hydrate").await;
    toggle(&app, habit_id, "2024-06-10", "completed").await;

    let (status, body) = send(&app, "DELETE", &format!("/habits/{habit_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted");

    let entries = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM habit_entries WHERE habit_id = ?1")
        .bind(habit_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(entries, 0);

    let (status, _) = send(&app, "DELETE", &format!("/habits/{habit_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let body = dashboard(&app, "2024-06-10").await;
    assert!(body["habits"].as_array().unwrap().is_empty());
}

#[sqlx::test]
async fn archived_habits_leave_the_dashboard(pool: SqlitePool) {
    let app = app(pool);
    let keep = create_habit(&app, "Hydrate").await;
    let archive = create_habit(&app, "Journal").await;

    send(
        &app,
        "PUT",
        &format!("/habits/{archive}"),
        Some(json!({ "isArchived": true })),
    )
    .await;

    let body = dashboard(&app, "2024-06-10").await;
    let ids: Vec<i64> = body["habits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![keep]);
}

#[sqlx::test]
async fn dashboard_orders_habits_by_creation(pool: SqlitePool) {
    let app = app(pool);
    let first = create_habit(&app, "Hydrate").await;
    let second = create_habit(&app, "Journal").await;
    let third = create_habit(&app, "Stretch").await;

    let body = dashboard(&app, "2024-06-10").await;
    let ids: Vec<i64> = body["habits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![first, second, third]);
}

#[sqlx::test]
async fn habit_update_merges_fields(pool: SqlitePool) {
    let app = app(pool);
    let habit_id = create_habit(&app, "Hydrate").await;

    let (status, habit) = send(
        &app,
        "PUT",
        &format!("/habits/{habit_id}"),
        Some(json!({ "title": "Hydrate more", "period": "evening" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(habit["title"], "Hydrate more");
    assert_eq!(habit["period"], "evening");
    assert_eq!(habit["icon"], "drop");
    assert_eq!(habit["time_value"], "500ml");
    assert_eq!(habit["is_archived"], false);

    let (status, _) = send(
        &app,
        "PUT",
        "/habits/9999",
        Some(json!({ "title": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn settings_upsert_merges(pool: SqlitePool) {
    let app = app(pool);

    let (status, settings) = send(
        &app,
        "POST",
        "/settings",
        Some(json!({ "preferred_view": "grid" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["preferred_view"], "grid");
    assert_eq!(settings["start_of_day_hour"], 0);

    let (_, settings) = send(
        &app,
        "POST",
        "/settings",
        Some(json!({ "start_of_day_hour": 5, "weekly_intention": "Slow mornings" })),
    )
    .await;
    assert_eq!(settings["preferred_view"], "grid");
    assert_eq!(settings["start_of_day_hour"], 5);
    assert_eq!(settings["weekly_intention"], "Slow mornings");

    let (status, _) = send(
        &app,
        "POST",
        "/settings",
        Some(json!({ "start_of_day_hour": 24 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/settings",
        Some(json!({ "preferred_view": "cards" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
