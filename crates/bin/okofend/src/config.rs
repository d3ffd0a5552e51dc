//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `okofen.toml` in the working directory, or the file named by
//! `OKOFEN_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use okofen_adapter_webdriver::PanelConfig;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "okofen.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// API authentication.
    pub auth: AuthConfig,
    /// Control panel access.
    pub appliance: PanelConfig,
    /// Out-of-process worker and command deadline.
    pub worker: WorkerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Bearer token expected on command endpoints.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub token: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &"***")
            .finish()
    }
}

/// How commands are executed.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Worker executable. When unset, commands drive the panel in-process.
    pub path: Option<PathBuf>,
    /// Extra arguments placed before the action.
    pub args: Vec<String>,
    /// Deadline for a whole command, in seconds.
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `okofen.toml` (or `OKOFEN_CONFIG`) if present,
    /// then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed or
    /// unreadable.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("OKOFEN_CONFIG")
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("OKOFEN_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("OKOFEN_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("OKOFEN_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("OKOFEN_TOKEN") {
            self.auth.token = val;
        }
        if let Some(val) = var("OKOFEN_URL") {
            self.appliance.url = val;
        }
        if let Some(val) = var("OKOFEN_USER") {
            self.appliance.username = val;
        }
        if let Some(val) = var("OKOFEN_PASSWORD") {
            self.appliance.password = val;
        }
        if let Some(val) = var("OKOFEN_WEBDRIVER_URL") {
            self.appliance.webdriver_url = val;
        }
        if let Some(val) = var("OKOFEN_SCRIPT_PATH") {
            self.worker.path = (!val.is_empty()).then(|| PathBuf::from(val));
        }
        if let Some(secs) = var("OKOFEN_SCRIPT_TIMEOUT").and_then(|val| val.parse().ok()) {
            self.worker.timeout_secs = secs;
        }
        if let Some(val) = var("OKOFEN_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("OKOFEN_LOG_FILE") {
            self.logging.file = (!val.is_empty()).then(|| PathBuf::from(val));
        }
    }

    /// Check the settings the HTTP daemon needs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first problem found.
    pub fn validate_for_serve(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.worker.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "worker timeout must be non-zero".to_string(),
            ));
        }
        if self.auth.token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "an API token is required (OKOFEN_TOKEN)".to_string(),
            ));
        }
        if self.worker.path.is_none() {
            self.validate_for_worker()?;
        }
        Ok(())
    }

    /// Check the settings a single in-process run needs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when panel credentials are missing.
    pub fn validate_for_worker(&self) -> Result<(), ConfigError> {
        if !self.appliance.has_credentials() {
            return Err(ConfigError::Validation(
                "panel credentials are required (OKOFEN_USER, OKOFEN_PASSWORD)".to_string(),
            ));
        }
        if self.appliance.step_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "step timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl WorkerConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            path: None,
            args: Vec::new(),
            timeout_secs: 180,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "okofend=info,okofen=info,tower_http=debug".to_string(),
            file: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn with_env(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).cloned());
        config
    }

    fn servable() -> Config {
        with_env(&[
            ("OKOFEN_TOKEN", "secret"),
            ("OKOFEN_USER", "admin"),
            ("OKOFEN_PASSWORD", "hunter2"),
        ])
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.worker.timeout_secs, 180);
        assert!(config.worker.path.is_none());
        assert!(config.logging.file.is_none());
        assert_eq!(config.appliance.webdriver_url, "http://localhost:4444");
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [auth]
            token = 'abc'

            [appliance]
            url = 'http://10.0.0.2'
            username = 'admin'
            password = 'pw'
            headless = false

            [worker]
            path = '/opt/okofen/worker.sh'
            args = ['--verbose']
            timeout_secs = 60

            [logging]
            filter = 'debug'
            file = '/var/log/okofen.log'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.auth.token, "abc");
        assert_eq!(config.appliance.url, "http://10.0.0.2");
        assert!(!config.appliance.headless);
        assert_eq!(config.appliance.step_timeout_secs, 30);
        assert_eq!(
            config.worker.path.as_deref(),
            Some(Path::new("/opt/okofen/worker.sh"))
        );
        assert_eq!(config.worker.args, vec!["--verbose".to_string()]);
        assert_eq!(config.worker.timeout(), Duration::from_secs(60));
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(
            config.logging.file.as_deref(),
            Some(Path::new("/var/log/okofen.log"))
        );
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [worker]
            timeout_secs = 30
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.worker.timeout_secs, 30);
        assert_eq!(config.server.port, 5000);
        assert!(config.auth.token.is_empty());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_env_overrides() {
        let config = with_env(&[
            ("OKOFEN_BIND", "127.0.0.1:8081"),
            ("OKOFEN_TOKEN", "t0k"),
            ("OKOFEN_URL", "http://boiler.lan"),
            ("OKOFEN_SCRIPT_PATH", "/usr/local/bin/okofen-worker"),
            ("OKOFEN_SCRIPT_TIMEOUT", "45"),
            ("OKOFEN_LOG_FILE", "/tmp/okofen.log"),
            ("OKOFEN_WEBDRIVER_URL", "http://selenium:4444"),
        ]);
        assert_eq!(config.bind_addr(), "127.0.0.1:8081");
        assert_eq!(config.auth.token, "t0k");
        assert_eq!(config.appliance.url, "http://boiler.lan");
        assert_eq!(config.appliance.webdriver_url, "http://selenium:4444");
        assert_eq!(
            config.worker.path.as_deref(),
            Some(Path::new("/usr/local/bin/okofen-worker"))
        );
        assert_eq!(config.worker.timeout_secs, 45);
        assert_eq!(
            config.logging.file.as_deref(),
            Some(Path::new("/tmp/okofen.log"))
        );
    }

    #[test]
    fn should_prefer_rust_log_over_okofen_log() {
        let config = with_env(&[("OKOFEN_LOG", "warn"), ("RUST_LOG", "trace")]);
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_timeout_override() {
        let config = with_env(&[("OKOFEN_SCRIPT_TIMEOUT", "soon")]);
        assert_eq!(config.worker.timeout_secs, 180);
    }

    #[test]
    fn should_clear_worker_path_when_override_is_empty() {
        let mut config = Config::default();
        config.worker.path = Some(PathBuf::from("/bin/true"));
        config.apply_overrides(|key| (key == "OKOFEN_SCRIPT_PATH").then(String::new));
        assert!(config.worker.path.is_none());
    }

    #[test]
    fn should_accept_complete_serve_config() {
        assert!(servable().validate_for_serve().is_ok());
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = servable();
        config.server.port = 0;
        assert!(config.validate_for_serve().is_err());
    }

    #[test]
    fn should_reject_zero_timeout() {
        let mut config = servable();
        config.worker.timeout_secs = 0;
        assert!(config.validate_for_serve().is_err());
    }

    #[test]
    fn should_reject_missing_token() {
        let mut config = servable();
        config.auth.token = "  ".to_string();
        let err = config.validate_for_serve().unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn should_require_credentials_for_in_process_sessions() {
        let config = with_env(&[("OKOFEN_TOKEN", "secret")]);
        let err = config.validate_for_serve().unwrap_err();
        assert!(err.to_string().contains("credentials"));
    }

    #[test]
    fn should_not_require_credentials_with_a_worker() {
        let config = with_env(&[
            ("OKOFEN_TOKEN", "secret"),
            ("OKOFEN_SCRIPT_PATH", "/usr/local/bin/okofen-worker"),
        ]);
        assert!(config.validate_for_serve().is_ok());
    }

    #[test]
    fn should_redact_token_in_debug_output() {
        let rendered = format!("{:?}", servable().auth);
        assert!(!rendered.contains("secret"));
    }
}
