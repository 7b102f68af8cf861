use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub const DEFAULT_SUCCESS_MESSAGE: &str =
    "Client and Server bundles for TanStack Start have been successfully built";

pub const DEFAULT_BUILD_COMMANDS: [&str; 2] = [
    "paraglide-js compile --project ./project.inlang --outdir ./app/paraglide",
    "vite build",
];

/// Разделитель команд в WATCHER_COMMANDS.
pub const COMMAND_SEPARATOR: &str = ";;";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub seat_maps: SeatMapConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Redis опционален: без REDIS_URL данные живут в памяти процесса
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: Option<String>,
}

// Задержки mock-авторизации, мс
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub login_delay_ms: u64,
    pub register_delay_ms: u64,
    pub profile_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeatMapConfig {
    /// Зерно генератора для воспроизводимых схем залов.
    pub seed: Option<u64>,
}

// Настройки сборочного вотчера
#[derive(Debug, Clone, Deserialize)]
pub struct WatcherConfig {
    pub success_message: String,
    pub commands: Vec<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", 8000)?,
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "cinema_booking=debug,tower_http=debug".to_string()),
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            },
            auth: AuthConfig {
                login_delay_ms: parse_var("AUTH_LOGIN_DELAY_MS", 500)?,
                register_delay_ms: parse_var("AUTH_REGISTER_DELAY_MS", 800)?,
                profile_delay_ms: parse_var("AUTH_PROFILE_DELAY_MS", 300)?,
            },
            seat_maps: SeatMapConfig {
                seed: parse_optional_var("SEAT_MAP_SEED")?,
            },
        })
    }
}

impl WatcherConfig {
    pub fn from_env() -> Self {
        WatcherConfig {
            success_message: env::var("WATCHER_SUCCESS_MESSAGE")
                .unwrap_or_else(|_| DEFAULT_SUCCESS_MESSAGE.to_string()),
            commands: env::var("WATCHER_COMMANDS")
                .map(|raw| split_commands(&raw))
                .unwrap_or_else(|_| DEFAULT_BUILD_COMMANDS.iter().map(|c| c.to_string()).collect()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "cinema_booking=info".to_string()),
        }
    }
}

pub fn split_commands(raw: &str) -> Vec<String> {
    raw.split(COMMAND_SEPARATOR)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    Ok(parse_optional_var(key)?.unwrap_or(default))
}

fn parse_optional_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(None),
    }
}
