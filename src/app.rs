use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::identity;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let api_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/habits", post(handlers::habits::create_habit))
        .route("/habits/:id", put(handlers::habits::update_habit))
        .route("/habits/:id", delete(handlers::habits::delete_habit))
        .route("/entries/toggle", post(handlers::entries::toggle_entry))
        .route("/entries/note", post(handlers::entries::set_note))
        .route("/dailylog", post(handlers::daily_logs::upsert_daily_log))
        .route("/settings", post(handlers::settings::update_settings))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity::resolve_identity,
        ));

    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .frontend_url
                .parse::<axum::http::HeaderValue>()
                .expect("FRONTEND_URL is not a valid origin"),
        )
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
