//! Daemon settings: `cardflow.toml` in the working directory, then
//! `CARDFLOW_*` environment variables on top.
//!
//! The file is optional and every key has a default. `RUST_LOG` wins over
//! `CARDFLOW_LOG` when both are set.

use serde::Deserialize;

use cardflow_app::automation_engine::ActionFailurePolicy;

/// Everything `cardflowd` needs to start.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listener address.
    pub server: ServerConfig,
    /// Where rules, cards and audit entries live.
    pub database: DatabaseConfig,
    /// `tracing` filter.
    pub logging: LoggingConfig,
    /// Rule execution settings.
    pub automation: AutomationConfig,
}

/// `[server]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `[database]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `sqlx` `SQLite` URL.
    pub url: String,
}

/// `[logging]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive.
    pub filter: String,
}

/// `[automation]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// `stop` or `continue`: what a rule does after a failed action.
    pub on_action_failure: String,
}

impl Config {
    /// Read `cardflow.toml`, apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when the merged settings are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("cardflow.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("CARDFLOW_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("CARDFLOW_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("CARDFLOW_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("CARDFLOW_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("CARDFLOW_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("CARDFLOW_ON_ACTION_FAILURE") {
            self.automation.on_action_failure = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        self.automation
            .on_action_failure
            .parse::<ActionFailurePolicy>()
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        Ok(())
    }

    /// `host:port` for the TCP listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// URL handed to the storage adapter.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// The configured policy, falling back to the default when unparsable.
    #[must_use]
    pub fn action_failure_policy(&self) -> ActionFailurePolicy {
        self.automation
            .on_action_failure
            .parse()
            .unwrap_or_default()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:cardflow.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "cardflowd=info,cardflow=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            on_action_failure: ActionFailurePolicy::default().to_string(),
        }
    }
}

/// Why the daemon refused its configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cardflow.toml is not valid TOML")]
    Parse(#[from] toml::de::Error),
    #[error("cardflow.toml could not be read")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_env(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).cloned());
        config
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:cardflow.db?mode=rwc");
        assert_eq!(config.automation.on_action_failure, "stop");
        assert_eq!(
            config.action_failure_policy(),
            ActionFailurePolicy::StopOnFailure
        );
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [automation]
            on_action_failure = 'continue'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(
            config.action_failure_policy(),
            ActionFailurePolicy::ContinueOnFailure
        );
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_unknown_policy() {
        let mut config = Config::default();
        config.automation.on_action_failure = "retry".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("retry"));
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_override_from_env() {
        let config = with_env(&[
            ("CARDFLOW_HOST", "10.0.0.1"),
            ("CARDFLOW_PORT", "8081"),
            ("CARDFLOW_DATABASE_URL", "sqlite::memory:"),
            ("CARDFLOW_ON_ACTION_FAILURE", "continue"),
        ]);
        assert_eq!(config.bind_addr(), "10.0.0.1:8081");
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(
            config.action_failure_policy(),
            ActionFailurePolicy::ContinueOnFailure
        );
    }

    #[test]
    fn should_let_bind_override_host_and_port() {
        let config = with_env(&[("CARDFLOW_PORT", "8081"), ("CARDFLOW_BIND", "127.0.0.1:9999")]);
        assert_eq!(config.bind_addr(), "127.0.0.1:9999");
    }

    #[test]
    fn should_prefer_rust_log_over_cardflow_log() {
        let config = with_env(&[("CARDFLOW_LOG", "warn"), ("RUST_LOG", "trace")]);
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_port_override() {
        let config = with_env(&[("CARDFLOW_PORT", "not-a-port")]);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
