//! Process settings from the environment. Call `dotenvy::dotenv()` first to pick up `.env`.

use crate::error::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./database.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub body_limit_bytes: usize,
    /// Extra entities to serve alongside the built-in one.
    pub entity_config: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: DEFAULT_DATABASE_URL.into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            entity_config: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `DATABASE_URL` wins over the older `DB_URL`.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let database_url = get("DATABASE_URL")
            .or_else(|| get("DB_URL"))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.database_url);
        let bind_addr = get("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let max_connections = parse_or(get("MAX_CONNECTIONS"), "MAX_CONNECTIONS", defaults.max_connections)?;
        if max_connections == 0 {
            return Err(ConfigError::Load("MAX_CONNECTIONS must be at least 1".into()));
        }
        let body_limit_bytes = parse_or(get("BODY_LIMIT_BYTES"), "BODY_LIMIT_BYTES", defaults.body_limit_bytes)?;
        let entity_config = get("ENTITY_CONFIG").filter(|s| !s.is_empty()).map(PathBuf::from);
        Ok(Settings {
            database_url,
            bind_addr,
            max_connections,
            body_limit_bytes,
            entity_config,
        })
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse()
            .map_err(|_| ConfigError::Load(format!("{} is not a valid number: {}", key, s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let s = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(s.max_connections, 5);
        assert!(s.entity_config.is_none());
    }

    #[test]
    fn db_url_is_a_fallback_for_database_url() {
        let s = Settings::from_lookup(lookup(&[("DB_URL", "sqlite://tasks.db")])).unwrap();
        assert_eq!(s.database_url, "sqlite://tasks.db");

        let s = Settings::from_lookup(lookup(&[
            ("DB_URL", "sqlite://tasks.db"),
            ("DATABASE_URL", "sqlite://items.db"),
        ]))
        .unwrap();
        assert_eq!(s.database_url, "sqlite://items.db");
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = Settings::from_lookup(lookup(&[("MAX_CONNECTIONS", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
        let err = Settings::from_lookup(lookup(&[("MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
