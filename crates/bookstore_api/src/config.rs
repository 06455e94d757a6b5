//! Environment configuration for the request-facing layer.
//!
//! # Responsibility
//! - Resolve database location, the configured store and logging settings.
//!
//! # Invariants
//! - Blank variables behave exactly like unset ones.
//! - Resolution never fails; every setting has a default.

use bookstore_core::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "BOOKSTORE_DB_PATH";
pub const ENV_STORE_NAME: &str = "BOOKSTORE_STORE_NAME";
pub const ENV_STORE_ADDRESS: &str = "BOOKSTORE_STORE_ADDRESS";
pub const ENV_SEED_TITLES: &str = "BOOKSTORE_SEED_TITLES";
pub const ENV_LOG_LEVEL: &str = "BOOKSTORE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BOOKSTORE_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "bookstore.sqlite3";
const DEFAULT_STORE_NAME: &str = "CGI";
const DEFAULT_STORE_ADDRESS: &str = "15 Avenue du Docteur Maurice Grynfogel";
const DEFAULT_SEED_TITLES: &[&str] = &["Le DevOps c'est super !", "Le Python pour les nuls"];
const SEED_SEPARATOR: char = '|';

/// Settings for one bookstore process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub db_path: PathBuf,
    pub store_name: String,
    pub store_address: String,
    /// Titles guaranteed to be in the configured store after bootstrap.
    pub seed_titles: Vec<String>,
    pub log_level: String,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ApiConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let seed_titles = match read(ENV_SEED_TITLES) {
            Some(raw) => raw
                .split(SEED_SEPARATOR)
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_SEED_TITLES.iter().map(|title| title.to_string()).collect(),
        };

        Self {
            db_path: read(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            store_name: read(ENV_STORE_NAME).unwrap_or_else(|| DEFAULT_STORE_NAME.to_string()),
            store_address: read(ENV_STORE_ADDRESS)
                .unwrap_or_else(|| DEFAULT_STORE_ADDRESS.to_string()),
            seed_titles,
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_SEED_TITLES, ENV_STORE_NAME};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> ApiConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_describe_the_cgi_store() {
        let config = ApiConfig::default();
        assert_eq!(config.store_name, "CGI");
        assert_eq!(config.seed_titles.len(), 2);
        assert!(config.db_path.ends_with("bookstore.sqlite3"));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[(ENV_STORE_NAME, "   "), (ENV_DB_PATH, "")]);
        assert_eq!(config.store_name, "CGI");
        assert!(config.db_path.ends_with("bookstore.sqlite3"));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            (ENV_DB_PATH, "/var/lib/bookstore/db.sqlite3"),
            (ENV_SEED_TITLES, "Le Petit Prince| |L'Étranger "),
            (ENV_LOG_DIR, "/var/log/bookstore"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/var/lib/bookstore/db.sqlite3"));
        assert_eq!(config.seed_titles, vec!["Le Petit Prince", "L'Étranger"]);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/bookstore")));
    }
}
