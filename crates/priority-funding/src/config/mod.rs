use crate::funding::{validate_pool, ScoringPolicy};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub funding: FundingConfig,
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

        let funding = FundingConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            funding,
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

pub const DEFAULT_FUNDING_POOL: f64 = 1_000_000.0;
pub const DEFAULT_COUNTRY: &str = "Algeria";

/// Funding pool, scoring policy, and initial region set.
#[derive(Debug, Clone, PartialEq)]
pub struct FundingConfig {
    pub total_pool: f64,
    pub policy: ScoringPolicy,
    pub default_country: String,
    pub region_csv: Option<PathBuf>,
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            total_pool: DEFAULT_FUNDING_POOL,
            policy: ScoringPolicy::default(),
            default_country: DEFAULT_COUNTRY.to_string(),
            region_csv: None,
        }
    }
}

impl FundingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let total_pool = match env::var("FUNDING_POOL") {
            Ok(raw) => parse_pool(&raw)?,
            Err(_) => DEFAULT_FUNDING_POOL,
        };

        let policy = match env::var("FUNDING_POLICY") {
            Ok(raw) => raw
                .parse::<ScoringPolicy>()
                .map_err(|_| ConfigError::InvalidPolicy(raw))?,
            Err(_) => ScoringPolicy::default(),
        };

        let default_country = env::var("FUNDING_COUNTRY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

        let region_csv = env::var("FUNDING_REGION_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            total_pool,
            policy,
            default_country,
            region_csv,
        })
    }
}

fn parse_pool(raw: &str) -> Result<f64, ConfigError> {
    let pool = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidPool(raw.to_string()))?;
    validate_pool(pool).map_err(|_| ConfigError::InvalidPool(raw.to_string()))?;
    Ok(pool)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPool(String),
    InvalidPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPool(raw) => write!(
                f,
                "FUNDING_POOL must be a positive, finite amount (got '{}')",
                raw
            ),
            ConfigError::InvalidPolicy(raw) => write!(
                f,
                "FUNDING_POLICY must be 'pass-through' or 'strict' (got '{}')",
                raw
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidPool(_)
            | ConfigError::InvalidPolicy(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "FUNDING_POOL",
            "FUNDING_POLICY",
            "FUNDING_COUNTRY",
            "FUNDING_REGION_CSV",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.funding, FundingConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_funding_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FUNDING_POOL", "250000");
        env::set_var("FUNDING_POLICY", "strict");
        env::set_var("FUNDING_COUNTRY", "Mali");
        env::set_var("FUNDING_REGION_CSV", "regions.csv");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.funding.total_pool, 250_000.0);
        assert_eq!(config.funding.policy, ScoringPolicy::Strict);
        assert_eq!(config.funding.default_country, "Mali");
        assert_eq!(config.funding.region_csv, Some(PathBuf::from("regions.csv")));
        reset_env();
    }

    #[test]
    fn rejects_non_positive_pool() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FUNDING_POOL", "0");
        match AppConfig::load() {
            Err(ConfigError::InvalidPool(raw)) => assert_eq!(raw, "0"),
            other => panic!("expected invalid pool, got {other:?}"),
        }
        env::set_var("FUNDING_POOL", "lots");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidPool(_))
        ));
        env::set_var("FUNDING_POOL", "2e19");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidPool(_))
        ));
        reset_env();
    }

    #[test]
    fn rejects_unknown_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FUNDING_POLICY", "lenient");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidPolicy(_))
        ));
        reset_env();
    }
}
