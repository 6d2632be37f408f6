//! Server configuration using Figment
//!
//! Sources are merged in precedence order, later wins:
//! 1. Built-in defaults
//! 2. `taskboard.toml` in the working directory, or the file given with `--config`
//! 3. Environment variables prefixed `TASKBOARD_` (e.g. `TASKBOARD_DATABASE_PATH`)

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Config file read when `--config` is not given. Missing is fine.
pub const DEFAULT_CONFIG_FILE: &str = "taskboard.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "TASKBOARD_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
    pub database_path: PathBuf,
    /// How long a writer waits on SQLite's lock before reporting a conflict
    pub busy_timeout_ms: u64,
    pub upload_dir: PathBuf,
    pub upload_limit_bytes: usize,
    pub session_ttl_secs: i64,
    /// Default tracing level when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            database_path: PathBuf::from("taskboard.db"),
            busy_timeout_ms: 5_000,
            upload_dir: PathBuf::from("uploads"),
            upload_limit_bytes: 20 * 1024 * 1024,
            session_ttl_secs: taskboard_kanban::auth::DEFAULT_SESSION_TTL_SECS,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from every source. An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> figment::Result<Self> {
        if let Some(path) = path {
            if !path.is_file() {
                return Err(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
        }
        let config: Self = Self::figment(path).extract()?;
        debug!(?config, "loaded server configuration");
        Ok(config)
    }

    /// The layered sources, before extraction
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_defaults() {
        let config: ServerConfig = ServerConfig::figment(Some(Path::new("/nonexistent/taskboard.toml")))
            .extract()
            .unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.upload_limit_bytes, 20 * 1024 * 1024);
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
    }

    #[test]
    #[serial]
    fn test_file_then_env_precedence() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taskboard.toml");
        fs::write(
            &path,
            "bind = \"0.0.0.0:9000\"\ndatabase_path = \"/data/board.db\"\nsession_ttl_secs = 60\n",
        )
        .unwrap();

        std::env::set_var("TASKBOARD_DATABASE_PATH", "/env/board.db");
        let config = ServerConfig::load(Some(&path));
        std::env::remove_var("TASKBOARD_DATABASE_PATH");
        let config = config.unwrap();

        assert_eq!(config.bind, "0.0.0.0:9000");
        assert_eq!(config.database_path, PathBuf::from("/env/board.db"));
        assert_eq!(config.session_ttl(), chrono::Duration::seconds(60));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    #[serial]
    fn test_explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = ServerConfig::load(Some(&temp.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
