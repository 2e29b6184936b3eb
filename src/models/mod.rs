pub mod daily_log;
pub mod entry;
pub mod habit;
pub mod settings;
