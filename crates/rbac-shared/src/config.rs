//! Configuration management

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::DEFAULT_MENU_DATA_FILE;
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub log: LogSettings,
    pub database: DatabaseSettings,
    pub menu: MenuSettings,
    pub snowflake: SnowflakeSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    /// Empty selects the in-memory store
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MenuSettings {
    /// JSON file with the menu trees used to seed an empty menu table
    pub data_file: String,
    pub seed_on_start: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnowflakeSettings {
    pub node_id: u64,
    pub worker_id: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.name", "rbac-server")?
            .set_default("log.level", "info")?
            .set_default("log.json", true)?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 3)?
            .set_default("menu.data_file", DEFAULT_MENU_DATA_FILE)?
            .set_default("menu.seed_on_start", true)?
            .set_default("snowflake.node_id", 1)?
            .set_default("snowflake.worker_id", 1)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
