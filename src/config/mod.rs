use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub venue: VenueConfig,
    pub client: ClientConfig,
}

// Настройки сервера
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    /// Логи в JSON вместо человекочитаемого формата.
    pub log_json: bool,
}

// Где лежат документы зала (venue-generated.json, venue.json)
#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    pub dir: PathBuf,
}

// Настройки клиента: откуда грузить зал, куда подключаться, где хранить выбор
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub venue_base_url: String,
    pub relay_url: String,
    pub reconnect_delay_ms: u64,
    pub max_reconnect_attempts: u32,
    pub selection_path: PathBuf,
}

impl ClientConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(key: &'static str, default: &str, expected: &'static str) -> Result<T, ConfigError> {
    let value = var_or(key, default);
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value, expected })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = parse_var("PORT", "8080", "port number")?;

        Ok(Config {
            app: AppConfig {
                host: var_or("HOST", "0.0.0.0"),
                port,
                environment: var_or("ENVIRONMENT", "development"),
                rust_log: var_or("RUST_LOG", "seat_map=debug,tower_http=debug"),
                log_json: parse_var("LOG_JSON", "false", "boolean (true/false)")?,
            },
            venue: VenueConfig {
                dir: PathBuf::from(var_or("VENUE_DIR", "public")),
            },
            client: ClientConfig {
                venue_base_url: var_or("VENUE_BASE_URL", &format!("http://localhost:{}", port)),
                relay_url: var_or("RELAY_URL", &format!("ws://localhost:{}/ws", port)),
                reconnect_delay_ms: parse_var("RELAY_RECONNECT_DELAY_MS", "3000", "number of milliseconds")?,
                max_reconnect_attempts: parse_var("RELAY_MAX_RECONNECT_ATTEMPTS", "5", "number")?,
                selection_path: PathBuf::from(var_or("SELECTION_STORE_PATH", ".seat-map/storage.json")),
            },
        })
    }
}
