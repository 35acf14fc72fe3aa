use crate::workflows::discipline::NegativePointsPolicy;
use std::env;
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

/// Deployment stage read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Colour codes are only written to an interactive developer terminal.
    pub fn ansi_logs(self) -> bool {
        self == Self::Development
    }

    /// Production logs carry module targets so aggregated output can be filtered.
    pub fn log_targets(self) -> bool {
        self == Self::Production
    }
}

/// Everything the API binary and the report commands read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub discipline: DisciplineConfig,
}

impl AppConfig {
    /// Reads `.env` when present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port_raw = var_or("APP_PORT", "3000");
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { value: port_raw })?;

        let negative_points = env::var("DISCIPLINE_NEGATIVE_POINTS")
            .ok()
            .map(|raw| parse_negative_points(&raw))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            environment: AppEnvironment::parse(&var_or("APP_ENV", "development")),
            server: ServerConfig {
                host: var_or("APP_HOST", "127.0.0.1"),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: var_or("APP_LOG_LEVEL", "info"),
            },
            discipline: DisciplineConfig { negative_points },
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_negative_points(raw: &str) -> Result<NegativePointsPolicy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "credit" | "allow" => Ok(NegativePointsPolicy::AllowCredit),
        "clamp" | "floor" => Ok(NegativePointsPolicy::ClampAtZero),
        _ => Err(ConfigError::InvalidNegativePointsPolicy {
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `localhost` is accepted as a shorthand for the IPv4 loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Default `tracing` filter, overridden by `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// How point totals treat negative adjustments.
#[derive(Debug, Clone, Copy)]
pub struct DisciplineConfig {
    pub negative_points: NegativePointsPolicy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a port number (found '{value}')")]
    InvalidPort { value: String },
    #[error("APP_HOST must be an IP address or localhost (found '{host}')")]
    InvalidHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("DISCIPLINE_NEGATIVE_POINTS must be 'credit' or 'clamp' (found '{value}')")]
    InvalidNegativePointsPolicy { value: String },
}
