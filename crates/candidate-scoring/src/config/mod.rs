use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::assessment::composition::DEFAULT_MINDSET_BASELINE;
use crate::workflows::assessment::scoring::{
    OracleFailurePolicy, ScoringConfig, DEFAULT_VERDICT_DELIMITER,
};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringSettings::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Scoring behavior that varies between deployments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringSettings {
    pub verdict_delimiter: char,
    pub oracle_failure: OracleFailurePolicy,
    pub mindset_baseline: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            verdict_delimiter: DEFAULT_VERDICT_DELIMITER,
            oracle_failure: OracleFailurePolicy::Abort,
            mindset_baseline: DEFAULT_MINDSET_BASELINE,
        }
    }
}

impl ScoringSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let verdict_delimiter = match env::var("SCORING_ORACLE_DELIMITER") {
            Ok(raw) => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(delimiter), None) => delimiter,
                    _ => return Err(ConfigError::InvalidDelimiter { value: raw }),
                }
            }
            Err(_) => defaults.verdict_delimiter,
        };

        let oracle_failure = match env::var("SCORING_ORACLE_FAILURE") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "abort" => OracleFailurePolicy::Abort,
                "zero" | "score_zero" => OracleFailurePolicy::ScoreZero,
                _ => return Err(ConfigError::InvalidFailurePolicy { value: raw }),
            },
            Err(_) => defaults.oracle_failure,
        };

        let mindset_baseline = match env::var("SCORING_MINDSET_BASELINE") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && (0.0..=100.0).contains(value))
                .ok_or(ConfigError::InvalidMindsetBaseline { value: raw })?,
            Err(_) => defaults.mindset_baseline,
        };

        Ok(Self {
            verdict_delimiter,
            oracle_failure,
            mindset_baseline,
        })
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            verdict_delimiter: self.verdict_delimiter,
            oracle_failure: self.oracle_failure,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDelimiter { value: String },
    InvalidFailurePolicy { value: String },
    InvalidMindsetBaseline { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDelimiter { value } => write!(
                f,
                "SCORING_ORACLE_DELIMITER must be a single character, got '{}'",
                value
            ),
            ConfigError::InvalidFailurePolicy { value } => write!(
                f,
                "SCORING_ORACLE_FAILURE must be 'abort' or 'zero', got '{}'",
                value
            ),
            ConfigError::InvalidMindsetBaseline { value } => write!(
                f,
                "SCORING_MINDSET_BASELINE must be a number between 0 and 100, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidDelimiter { .. }
            | ConfigError::InvalidFailurePolicy { .. }
            | ConfigError::InvalidMindsetBaseline { .. } => None,
        }
    }
}
