use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::Duration;

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
    pub dispatch: DispatchConfig,
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

        let default_driver =
            env::var("APP_DEFAULT_DRIVER").unwrap_or_else(|_| DEFAULT_DRIVER.to_string());
        let trip_duration_hours = env::var("APP_TRIP_DURATION_HOURS")
            .unwrap_or_else(|_| DEFAULT_TRIP_DURATION_HOURS.to_string())
            .parse::<u32>()
            .ok()
            .filter(|hours| *hours > 0)
            .ok_or(ConfigError::InvalidTripDuration)?;
        let vehicle_roster = env::var("APP_VEHICLE_ROSTER")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let max_sessions = env::var("APP_MAX_SESSIONS")
            .unwrap_or_else(|_| DEFAULT_MAX_SESSIONS.to_string())
            .parse::<usize>()
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or(ConfigError::InvalidSessionLimit)?;
        let session_idle_minutes = env::var("APP_SESSION_IDLE_MINUTES")
            .unwrap_or_else(|_| DEFAULT_SESSION_IDLE_MINUTES.to_string())
            .parse::<u64>()
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or(ConfigError::InvalidSessionLimit)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            dispatch: DispatchConfig {
                default_driver,
                trip_duration_hours,
                vehicle_roster,
                max_sessions,
                session_idle_minutes,
            },
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

const DEFAULT_DRIVER: &str = "DRV001";
const DEFAULT_TRIP_DURATION_HOURS: u32 = 24;
const DEFAULT_MAX_SESSIONS: usize = 1_000;
const DEFAULT_SESSION_IDLE_MINUTES: u64 = 30;

/// Trip confirmation defaults and roster source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Driver assigned when the chosen vehicle has no driver of its own.
    pub default_driver: String,
    pub trip_duration_hours: u32,
    /// Optional CSV roster; the service falls back to its built-in fleet when unset.
    pub vehicle_roster: Option<PathBuf>,
    /// Upper bound on sessions held by the allocation service.
    pub max_sessions: usize,
    /// Sessions untouched for this long are dropped on the next open.
    pub session_idle_minutes: u64,
}

impl DispatchConfig {
    pub fn trip_duration(&self) -> Duration {
        Duration::hours(i64::from(self.trip_duration_hours))
    }

    pub fn session_idle_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.session_idle_minutes.saturating_mul(60))
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_driver: DEFAULT_DRIVER.to_string(),
            trip_duration_hours: DEFAULT_TRIP_DURATION_HOURS,
            vehicle_roster: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_idle_minutes: DEFAULT_SESSION_IDLE_MINUTES,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTripDuration,
    InvalidSessionLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTripDuration => {
                write!(f, "APP_TRIP_DURATION_HOURS must be a positive integer")
            }
            ConfigError::InvalidSessionLimit => write!(
                f,
                "APP_MAX_SESSIONS and APP_SESSION_IDLE_MINUTES must be positive integers"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidTripDuration
            | ConfigError::InvalidSessionLimit => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
