//! Process configuration read from the environment.
//!
//! Everything has a default except `DATABASE_URL`, whose absence is a valid
//! state: the service then runs on the in-memory store.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub seed_on_startup: bool,
    pub run_migrations: bool,
    pub db_idle_timeout: Duration,
    pub db_connect_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("host", &self.host)
            .field("port", &self.port)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("seed_on_startup", &self.seed_on_startup)
            .field("run_migrations", &self.run_migrations)
            .field("db_idle_timeout", &self.db_idle_timeout)
            .field("db_connect_timeout", &self.db_connect_timeout)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            host: String::from("0.0.0.0"),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 100 * 1024 * 1024,
            seed_on_startup: true,
            run_migrations: true,
            db_idle_timeout: Duration::from_secs(30),
            db_connect_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // An empty DATABASE_URL means "not configured", same as unset.
        let database_url = lookup("DATABASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", &lookup, defaults.port)?,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", &lookup, defaults.max_upload_bytes)?,
            seed_on_startup: parse_flag("SEED_ON_STARTUP", &lookup, defaults.seed_on_startup)?,
            run_migrations: parse_flag("RUN_MIGRATIONS", &lookup, defaults.run_migrations)?,
            db_idle_timeout: parse_or::<u64, _>("DB_IDLE_TIMEOUT_SECS", &lookup, 30)
                .map(Duration::from_secs)?,
            db_connect_timeout: parse_or::<u64, _>("DB_CONNECT_TIMEOUT_SECS", &lookup, 10)
                .map(Duration::from_secs)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_flag<F>(key: &'static str, lookup: &F, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}
