//! Service configuration.
//!
//! Values come from an optional TOML file (path in `LEADBOARD_CONFIG`,
//! default `leadboard.toml`) and are then overridden by environment
//! variables:
//!
//! | Variable | Key |
//! |---|---|
//! | `LEADBOARD_HOST` | `host` |
//! | `LEADBOARD_PORT` | `port` |
//! | `LEADBOARD_DB` | `database_path` |
//! | `LEADBOARD_SESSION_SECRET` | `session_secret` |
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//! database_path = "leadboard.sqlite"
//! session_secret = "change me"
//!
//! [admin]
//! email = "admin@school.in"
//! name = "Admin"
//! password = "first-login"
//! ```

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "leadboard.toml";
pub const DEFAULT_SESSION_SECRET: &str = "leadboard-development-secret";

/// Account created on first start when the users table is empty.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// HMAC key for session cookies.
    pub session_secret: String,
    pub secure_cookies: bool,
    pub json_limit_bytes: usize,
    pub catalog_retry_attempts: u32,
    pub catalog_retry_delay_ms: u64,
    /// Directory holding the LiberationSans TTF files used for PDF export.
    pub fonts_dir: PathBuf,
    pub admin: Option<AdminSeed>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: PathBuf::from("leadboard.sqlite"),
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            secure_cookies: false,
            json_limit_bytes: 2 * 1024 * 1024,
            catalog_retry_attempts: 3,
            catalog_retry_delay_ms: 1000,
            fonts_dir: PathBuf::from("./fonts"),
            admin: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, String> {
        let path = env::var("LEADBOARD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let mut config = if Path::new(&path).exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| format!("Cannot read config file {}: {}", path, e))?;
            Self::from_toml(&text).map_err(|e| format!("Invalid config file {}: {}", path, e))?
        } else {
            AppConfig::default()
        };
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    fn apply_env<F>(&mut self, var: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = var("LEADBOARD_HOST") {
            self.host = host;
        }
        if let Some(port) = var("LEADBOARD_PORT") {
            self.port = port
                .parse()
                .map_err(|_| format!("LEADBOARD_PORT is not a port number: {}", port))?;
        }
        if let Some(db) = var("LEADBOARD_DB") {
            self.database_path = PathBuf::from(db);
        }
        if let Some(secret) = var("LEADBOARD_SESSION_SECRET") {
            self.session_secret = secret;
        }
        Ok(())
    }

    pub fn catalog_retry_delay(&self) -> Duration {
        Duration::from_millis(self.catalog_retry_delay_ms)
    }
}
