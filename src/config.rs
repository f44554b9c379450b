use crate::error::ConfigError;
use std::{env, fmt::Display, str::FromStr};

const DEFAULT_PORT: &str = "8080";
const DEFAULT_MAX_CONNECTIONS: &str = "20";
const DEFAULT_INDEX_LIMIT: &str = "5";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// How many questions the index page lists.
    pub index_limit: usize,
}

impl Config {
    /// Reads the process environment, after pulling in a `.env` file when one exists.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            port: try_load(&lookup, "PORT", DEFAULT_PORT)?,
            database_url,
            max_connections: try_load(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            index_limit: try_load(&lookup, "POLLS_INDEX_LIMIT", DEFAULT_INDEX_LIMIT)?,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
        })
}
