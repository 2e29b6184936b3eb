pub mod daily_logs;
pub mod dashboard;
pub mod entries;
pub mod habits;
pub mod health;
pub mod settings;
