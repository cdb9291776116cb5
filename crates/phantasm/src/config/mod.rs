use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::scoring::ScoringConfig;

const PLACEHOLDER_KEY: &str = "your_key_here";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

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
    pub collaborators: CollaboratorConfig,
    pub scoring: ScoringConfig,
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
            collaborators: CollaboratorConfig::from_env()?,
            scoring: scoring_from_env()?,
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

/// Credentials and limits for the external evidence producers.
///
/// A key left empty or set to the sample placeholder is treated as missing, and the
/// matching collaborator runs disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorConfig {
    pub news_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub scrapingbee_api_key: Option<String>,
    pub timeout: Duration,
}

impl CollaboratorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = match env::var("PHANTASM_COLLABORATOR_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout { value: raw })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let anthropic_model = env::var("ANTHROPIC_MODEL")
            .ok()
            .map(|model| model.trim().to_string())
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            news_api_key: credential("NEWS_API_KEY"),
            anthropic_api_key: credential("ANTHROPIC_API_KEY"),
            anthropic_model,
            scrapingbee_api_key: credential("SCRAPINGBEE_API_KEY"),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            news_api_key: None,
            anthropic_api_key: None,
            anthropic_model: DEFAULT_MODEL.to_string(),
            scrapingbee_api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn credential(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && value != PLACEHOLDER_KEY)
}

fn scoring_from_env() -> Result<ScoringConfig, ConfigError> {
    match env::var("PHANTASM_SCORING_FILE") {
        Ok(path) if !path.trim().is_empty() => load_scoring_file(PathBuf::from(path.trim())),
        _ => Ok(ScoringConfig::default()),
    }
}

/// Read a JSON weights document. Fields it leaves out keep their defaults.
pub fn load_scoring_file(path: PathBuf) -> Result<ScoringConfig, ConfigError> {
    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::ScoringFile {
        path: path.clone(),
        source,
    })?;
    let scoring: ScoringConfig = serde_json::from_str(&raw)
        .map_err(|source| ConfigError::ScoringFormat { path, source })?;

    if !scoring.thresholds.is_ordered() {
        return Err(ConfigError::InvalidThresholds {
            ghost: scoring.thresholds.ghost,
            suspicious: scoring.thresholds.suspicious,
        });
    }
    Ok(scoring)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout { value: String },
    ScoringFile { path: PathBuf, source: std::io::Error },
    ScoringFormat { path: PathBuf, source: serde_json::Error },
    InvalidThresholds { ghost: u8, suspicious: u8 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout { value } => write!(
                f,
                "PHANTASM_COLLABORATOR_TIMEOUT_SECS must be a positive integer, got '{}'",
                value
            ),
            ConfigError::ScoringFile { path, .. } => {
                write!(f, "unable to read scoring file {}", path.display())
            }
            ConfigError::ScoringFormat { path, source } => {
                write!(f, "scoring file {} is not valid: {}", path.display(), source)
            }
            ConfigError::InvalidThresholds { ghost, suspicious } => write!(
                f,
                "score thresholds must satisfy suspicious <= ghost <= 100, got suspicious={} ghost={}",
                suspicious, ghost
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeout { .. }
            | ConfigError::InvalidThresholds { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::ScoringFile { source, .. } => Some(source),
            ConfigError::ScoringFormat { source, .. } => Some(source),
        }
    }
}
