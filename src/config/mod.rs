/// Database connection and schema management
pub mod database;

/// Engine settings (rates, tracking-ID shape, notification identity) from TOML
pub mod settings;
