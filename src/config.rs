//! Configuration module for feedlist.

use serde::Deserialize;
use std::path::Path;

use crate::listing::{SortOrder, StateMask};
use crate::{FeedlistError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/feedlist.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Site information shown in titles and on the about page.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    #[serde(default = "default_site_title")]
    pub title: String,
    /// Site description.
    #[serde(default = "default_site_description")]
    pub description: String,
}

fn default_site_title() -> String {
    "feedlist".to_string()
}

fn default_site_description() -> String {
    "A self-hosted feed reader".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            description: default_site_description(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/feedlist.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Reading defaults.
///
/// These seed the preferences of newly created users and bound what a
/// request may ask for.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingConfig {
    /// Default state mask (READ=1, UNREAD=2, FAVORITE=4).
    #[serde(default = "default_view_state")]
    pub default_view_state: u8,
    /// Default sort order ("asc" or "desc").
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
    /// Default number of entries per page.
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: u32,
    /// Upper bound for the `nb` request parameter.
    #[serde(default = "default_max_posts_per_page")]
    pub max_posts_per_page: u32,
    /// Default view mode ("normal" or "global").
    #[serde(default = "default_view_mode")]
    pub view_mode: String,
}

fn default_view_state() -> u8 {
    StateMask::UNREAD.bits()
}

fn default_sort_order() -> String {
    "desc".to_string()
}

fn default_posts_per_page() -> u32 {
    20
}

fn default_max_posts_per_page() -> u32 {
    500
}

fn default_view_mode() -> String {
    "normal".to_string()
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            default_view_state: default_view_state(),
            sort_order: default_sort_order(),
            posts_per_page: default_posts_per_page(),
            max_posts_per_page: default_max_posts_per_page(),
            view_mode: default_view_mode(),
        }
    }
}

/// Web configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// JWT secret key used to verify session tokens.
    #[serde(default)]
    pub jwt_secret: String,
    /// Whether entry views are readable without a session.
    #[serde(default)]
    pub allow_anonymous: bool,
    /// Username whose entries are shown to anonymous readers.
    #[serde(default)]
    pub default_user: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![],
            jwt_secret: String::new(),
            allow_anonymous: false,
            default_user: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Site information.
    #[serde(default)]
    pub site: SiteConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Reading defaults.
    #[serde(default)]
    pub reading: ReadingConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FeedlistError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FeedlistError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FEEDLIST_JWT_SECRET`: Override the JWT secret key
    pub fn apply_env_overrides(&mut self) {
        if let Ok(jwt_secret) = std::env::var("FEEDLIST_JWT_SECRET") {
            if !jwt_secret.is_empty() {
                self.web.jwt_secret = jwt_secret;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.web.jwt_secret.is_empty() {
            return Err(FeedlistError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via FEEDLIST_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.web.allow_anonymous && self.web.default_user.is_empty() {
            return Err(FeedlistError::Config(
                "allow_anonymous requires default_user to be set".to_string(),
            ));
        }
        if StateMask::from_bits(self.reading.default_view_state).is_none() {
            return Err(FeedlistError::Config(format!(
                "invalid default_view_state: {}",
                self.reading.default_view_state
            )));
        }
        if SortOrder::parse(&self.reading.sort_order).is_none() {
            return Err(FeedlistError::Config(format!(
                "invalid sort_order: {}",
                self.reading.sort_order
            )));
        }
        if self.reading.posts_per_page == 0
            || self.reading.posts_per_page > self.reading.max_posts_per_page
        {
            return Err(FeedlistError::Config(format!(
                "posts_per_page must be between 1 and {}",
                self.reading.max_posts_per_page
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "data/feedlist.db");
        assert_eq!(config.site.title, "feedlist");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/feedlist.log");

        assert_eq!(config.reading.default_view_state, 2);
        assert_eq!(config.reading.sort_order, "desc");
        assert_eq!(config.reading.posts_per_page, 20);
        assert_eq!(config.reading.max_posts_per_page, 500);
        assert_eq!(config.reading.view_mode, "normal");

        assert!(config.web.cors_origins.is_empty());
        assert!(config.web.jwt_secret.is_empty());
        assert!(!config.web.allow_anonymous);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 3000

[database]
path = "custom/db.sqlite"

[site]
title = "My Reader"
description = "Reading list"

[logging]
level = "debug"
file = "custom/logs/app.log"

[reading]
default_view_state = 3
sort_order = "asc"
posts_per_page = 50
max_posts_per_page = 200
view_mode = "global"

[web]
cors_origins = ["http://localhost:5173"]
jwt_secret = "test-secret-key"
allow_anonymous = true
default_user = "alice"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, "custom/db.sqlite");
        assert_eq!(config.site.title, "My Reader");
        assert_eq!(config.site.description, "Reading list");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.reading.default_view_state, 3);
        assert_eq!(config.reading.sort_order, "asc");
        assert_eq!(config.reading.posts_per_page, 50);
        assert_eq!(config.reading.max_posts_per_page, 200);
        assert_eq!(config.reading.view_mode, "global");
        assert_eq!(config.web.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.web.jwt_secret, "test-secret-key");
        assert!(config.web.allow_anonymous);
        assert_eq!(config.web.default_user, "alice");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[reading]
posts_per_page = 10
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.reading.posts_per_page, 10);
        assert_eq!(config.reading.sort_order, "desc");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        if let Err(FeedlistError::Validation(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(FeedlistError::Io(_))));
    }

    #[test]
    fn test_apply_env_overrides_jwt_secret() {
        let original = std::env::var("FEEDLIST_JWT_SECRET").ok();

        std::env::set_var("FEEDLIST_JWT_SECRET", "env-secret-key");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.web.jwt_secret, "env-secret-key");

        if let Some(val) = original {
            std::env::set_var("FEEDLIST_JWT_SECRET", val);
        } else {
            std::env::remove_var("FEEDLIST_JWT_SECRET");
        }
    }

    #[test]
    fn test_validate_requires_secret() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(FeedlistError::Config(_))));
    }

    #[test]
    fn test_validate_anonymous_requires_default_user() {
        let mut config = Config::default();
        config.web.jwt_secret = "secret".to_string();
        config.web.allow_anonymous = true;

        let result = config.validate();
        if let Err(FeedlistError::Config(msg)) = result {
            assert!(msg.contains("default_user"));
        } else {
            panic!("Expected Config error");
        }

        config.web.default_user = "alice".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_reading_defaults() {
        let mut config = Config::default();
        config.web.jwt_secret = "secret".to_string();

        config.reading.default_view_state = 0;
        assert!(config.validate().is_err());

        config.reading.default_view_state = 2;
        config.reading.sort_order = "sideways".to_string();
        assert!(config.validate().is_err());

        config.reading.sort_order = "asc".to_string();
        config.reading.posts_per_page = 0;
        assert!(config.validate().is_err());
    }
}
