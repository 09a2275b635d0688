use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::bonus::{AccessGate, CalculationSettings, CorporateAxis, InterpolationPolicy};

/// Deployment stage, read from `APP_ENV`.
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
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub bonus: BonusConfig,
}

impl AppConfig {
    /// Read `.env` if present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            bonus: BonusConfig::from_env()?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

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

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Calculation defaults and the optional shared password for the bonus API.
#[derive(Debug, Clone, Default)]
pub struct BonusConfig {
    pub access_password: Option<String>,
    pub calculation: CalculationSettings,
}

impl BonusConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let access_password = env::var("BONUS_ACCESS_PASSWORD").ok();

        let policy = match env::var("BONUS_POLICY") {
            Ok(value) => InterpolationPolicy::parse(&value)
                .ok_or(ConfigError::InvalidPolicy(value))?,
            Err(_) => InterpolationPolicy::default(),
        };
        let corporate_axis = match env::var("BONUS_CORPORATE_AXIS") {
            Ok(value) => {
                CorporateAxis::parse(&value).ok_or(ConfigError::InvalidCorporateAxis(value))?
            }
            Err(_) => CorporateAxis::default(),
        };

        Ok(Self {
            access_password,
            calculation: CalculationSettings {
                policy,
                corporate_axis,
            },
        })
    }

    pub fn access_gate(&self) -> AccessGate {
        AccessGate::new(self.access_password.clone())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPolicy(String),
    InvalidCorporateAxis(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPolicy(value) => write!(
                f,
                "BONUS_POLICY must be 'linear' or 'step' (found '{}')",
                value
            ),
            ConfigError::InvalidCorporateAxis(value) => write!(
                f,
                "BONUS_CORPORATE_AXIS must be 'score' or 'achievement' (found '{}')",
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
            | ConfigError::InvalidPolicy(_)
            | ConfigError::InvalidCorporateAxis(_) => None,
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
            "BONUS_ACCESS_PASSWORD",
            "BONUS_POLICY",
            "BONUS_CORPORATE_AXIS",
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
        assert_eq!(config.bonus.access_password, None);
        assert_eq!(config.bonus.calculation, CalculationSettings::default());
        assert!(config.bonus.access_gate().is_open());
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
    fn reads_bonus_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BONUS_ACCESS_PASSWORD", "bonus2025");
        env::set_var("BONUS_POLICY", "Step");
        env::set_var("BONUS_CORPORATE_AXIS", "achievement");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.bonus.access_password.as_deref(), Some("bonus2025"));
        assert_eq!(config.bonus.calculation.policy, InterpolationPolicy::Step);
        assert_eq!(
            config.bonus.calculation.corporate_axis,
            CorporateAxis::Achievement
        );
        assert!(!config.bonus.access_gate().is_open());
        reset_env();
    }

    #[test]
    fn rejects_unknown_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BONUS_POLICY", "cubic");

        match AppConfig::load() {
            Err(ConfigError::InvalidPolicy(value)) => assert_eq!(value, "cubic"),
            other => panic!("expected invalid policy error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_invalid_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "eighty");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidPort)));
        reset_env();
    }
}
