//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: CATALOG_, nested keys separated by `__`),
//!    then a plain `PORT` variable
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/catalog-service/{service_name}/config.toml
//! 4. System directory: /etc/catalog-service/{service_name}/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Environment prefix for configuration overrides
pub const ENV_PREFIX: &str = "CATALOG_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Error response configuration
    #[serde(default)]
    pub errors: ErrorsConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Deployment environment (development, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Path prefix the catalog routes are mounted under
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl ServiceConfig {
    /// Whether the service runs in a production-like environment
    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.trim().to_ascii_lowercase().as_str(),
            "production" | "prod"
        )
    }

    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    #[serde(default = "default_true")]
    pub compression: bool,

    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            compression: true,
            cors_mode: default_cors_mode(),
        }
    }
}

/// Error response configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorsConfig {
    /// Include diagnostic traces in error responses.
    ///
    /// Unset means "derive from `service.environment`": traces are disclosed
    /// everywhere except production.
    #[serde(default)]
    pub disclose_diagnostics: Option<bool>,
}

// Default value functions
fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_base_path() -> String {
    "/api".to_string()
}

fn default_true() -> bool {
    true
}

fn default_body_limit_mb() -> usize {
    10 // 10 MB
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

/// Plain `PORT` variable, honoured below the prefixed overrides
fn port_env() -> Env {
    Env::raw().only(&["PORT"]).map(|_| "service.port".into())
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Searches for config files in this order (first found is used):
    /// 1. Current working directory: ./config.toml
    /// 2. XDG config directory: ~/.config/catalog-service/{service_name}/config.toml
    /// 3. System directory: /etc/catalog-service/{service_name}/config.toml
    ///
    /// Environment variables (CATALOG_ prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "catalog-service".to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(port_env()).merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses XDG directories and loads directly from the given path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(port_env())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Find all possible config file paths for a service, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix("catalog-service");
        let config_file_path = Path::new(service_name).join("config.toml");
        if let Some(path) = xdg_dirs.find_config_file(&config_file_path) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc/catalog-service")
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }

    /// Resolve whether error responses carry diagnostic traces
    pub fn disclose_diagnostics(&self) -> bool {
        self.errors
            .disclose_diagnostics
            .unwrap_or_else(|| !self.service.is_production())
    }

    /// Request body limit in bytes
    pub fn body_limit_bytes(&self) -> usize {
        self.middleware.body_limit_mb * 1024 * 1024
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "catalog-service".to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
                base_path: default_base_path(),
            },
            middleware: MiddlewareConfig::default(),
            errors: ErrorsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 3000);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.service.base_path, "/api");
        assert_eq!(config.body_limit_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_diagnostics_follow_environment() {
        let mut config = Config::default();
        assert!(config.disclose_diagnostics());

        config.service.environment = "Production".to_string();
        assert!(!config.disclose_diagnostics());

        config.service.environment = "prod".to_string();
        assert!(!config.disclose_diagnostics());

        config.service.environment = "staging".to_string();
        assert!(config.disclose_diagnostics());
    }

    #[test]
    fn test_explicit_diagnostics_override_environment() {
        let mut config = Config::default();
        config.service.environment = "production".to_string();
        config.errors.disclose_diagnostics = Some(true);
        assert!(config.disclose_diagnostics());

        config.service.environment = "development".to_string();
        config.errors.disclose_diagnostics = Some(false);
        assert!(!config.disclose_diagnostics());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
name = "catalog-test"
port = 8181
environment = "production"

[middleware]
body_limit_mb = 2
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.name, "catalog-test");
        assert_eq!(config.service.port, 8181);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.middleware.body_limit_mb, 2);
        assert_eq!(config.middleware.cors_mode, "permissive");
        assert!(!config.disclose_diagnostics());
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let config = Config::load_from("/nonexistent/catalog/config.toml").unwrap();
        assert_eq!(config.service.name, "catalog-service");
        assert_eq!(config.service.timeout(), Duration::from_secs(30));
    }
}
