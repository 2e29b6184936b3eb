use std::sync::Arc;

use sqlx::SqlitePool;

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod history;
pub mod identity;
pub mod models;
pub mod sync;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
}

pub use app::router;
