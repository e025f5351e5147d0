//! Typed application settings.
//!
//! The whole configuration surface is read from the process environment
//! exactly once at boot, validated, and then carried immutably inside the
//! application state. Handlers never reach for `std::env` at request time.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use thiserror::Error;

/// Fatal boot-time configuration failure.
///
/// Any of these aborts startup before the listen port is bound; dependency
/// outages are deliberately *not* represented here (they belong to the
/// readiness probe).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Deployment environment, selected by `ENVIRONMENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            "test" | "testing" => Self::Test,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Default bcrypt work factor for this environment. Low in dev/test so
    /// the suite stays fast, production-grade otherwise.
    pub const fn default_bcrypt_cost(self) -> u32 {
        match self {
            Self::Development | Self::Test => 4,
            Self::Staging => 10,
            Self::Production => 12,
        }
    }
}

/// Immutable process-wide settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub debug: bool,
    /// Token-signing key material. Required outside debug runs.
    pub secret_key: String,
    pub database_url: String,
    pub database_name: String,
    pub cache_url: String,
    /// Optional error-tracking endpoint, only reported at boot.
    pub sentry_dsn: Option<String>,
    /// Accepted `Host` header values. `*` disables the check.
    pub allowed_hosts: Vec<String>,
    pub host: String,
    pub port: u16,
    pub workers: usize,
    /// Upper bound on each dependency ping in the readiness probe.
    pub probe_timeout: Duration,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst_size: u32,
    pub token_expiration_hours: i64,
    pub token_refresh_expiration_days: i64,
    pub bcrypt_cost: u32,
}

/// Fallback signing key for debug runs only.
const DEBUG_SECRET_KEY: &str = "insecure-debug-secret-key";

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or a value
    /// fails to parse. Callers are expected to treat this as fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Builds settings from an explicit key/value map. Split out from
    /// [`from_env`](Self::from_env) so tests can exercise the schema without
    /// touching the process environment.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(String::as_str);

        let environment = Environment::parse(get("ENVIRONMENT").unwrap_or("production"));

        let debug = match get("DEBUG") {
            None => false,
            Some(raw) => parse_bool(raw).ok_or_else(|| ConfigError::InvalidVar {
                var: "DEBUG",
                reason: format!("expected a boolean, got {raw:?}"),
            })?,
        };

        let secret_key = match get("SECRET_KEY") {
            Some(key) if !key.is_empty() => key.to_string(),
            _ if debug => DEBUG_SECRET_KEY.to_string(),
            _ => return Err(ConfigError::MissingVar("SECRET_KEY")),
        };

        let port = parse_or_default(get("PORT"), 8000u16, "PORT")?;
        let workers = parse_or_default(get("WEB_CONCURRENCY"), 4usize, "WEB_CONCURRENCY")?;
        let probe_timeout_secs =
            parse_or_default(get("PROBE_TIMEOUT_SECONDS"), 3u64, "PROBE_TIMEOUT_SECONDS")?;

        let allowed_hosts: Vec<String> = get("ALLOWED_HOSTS")
            .unwrap_or("localhost,127.0.0.1")
            .split(',')
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty())
            .collect();

        if allowed_hosts.is_empty() {
            return Err(ConfigError::InvalidVar {
                var: "ALLOWED_HOSTS",
                reason: "at least one host is required".to_string(),
            });
        }

        let bcrypt_cost = match get("BCRYPT_COST") {
            None => environment.default_bcrypt_cost(),
            Some(raw) => {
                let cost: u32 = parse_or_default(Some(raw), 0, "BCRYPT_COST")?;
                if !(4..=15).contains(&cost) {
                    return Err(ConfigError::InvalidVar {
                        var: "BCRYPT_COST",
                        reason: format!("{cost} is outside the supported range 4..=15"),
                    });
                }
                cost
            }
        };

        Ok(Self {
            environment,
            debug,
            secret_key,
            database_url: get("DATABASE_URL")
                .unwrap_or("mongodb://localhost:27017")
                .to_string(),
            database_name: get("DATABASE_NAME").unwrap_or("finacle").to_string(),
            cache_url: get("CACHE_URL").unwrap_or("redis://localhost:6379").to_string(),
            sentry_dsn: get("SENTRY_DSN").filter(|dsn| !dsn.is_empty()).map(String::from),
            allowed_hosts,
            host: get("HOST").unwrap_or("0.0.0.0").to_string(),
            port,
            workers,
            probe_timeout: Duration::from_secs(probe_timeout_secs),
            rate_limit_per_second: parse_or_default(
                get("RATE_LIMIT_PER_SECOND"),
                100,
                "RATE_LIMIT_PER_SECOND",
            )?,
            rate_limit_burst_size: parse_or_default(
                get("RATE_LIMIT_BURST_SIZE"),
                200,
                "RATE_LIMIT_BURST_SIZE",
            )?,
            token_expiration_hours: parse_or_default(
                get("TOKEN_EXPIRATION_HOURS"),
                24,
                "TOKEN_EXPIRATION_HOURS",
            )?,
            token_refresh_expiration_days: parse_or_default(
                get("TOKEN_REFRESH_EXPIRATION_DAYS"),
                7,
                "TOKEN_REFRESH_EXPIRATION_DAYS",
            )?,
            bcrypt_cost,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    /// Whether `host` (no port) is an acceptable `Host` header value.
    pub fn is_host_allowed(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.allowed_hosts
            .iter()
            .any(|allowed| allowed == "*" || *allowed == host)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or_default<T: std::str::FromStr>(
    raw: Option<&str>,
    default: T,
    var: &'static str,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            var,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse("dev"), Environment::Development);
        assert_eq!(Environment::parse("test"), Environment::Test);
        assert_eq!(Environment::parse("staging"), Environment::Staging);
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("anything-else"), Environment::Production);
    }

    #[test]
    fn test_defaults_with_secret_key() {
        let settings = Settings::from_vars(&vars(&[("SECRET_KEY", "s3cret")])).unwrap();

        assert_eq!(settings.environment, Environment::Production);
        assert!(!settings.debug);
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.workers, 4);
        assert_eq!(settings.database_url, "mongodb://localhost:27017");
        assert_eq!(settings.cache_url, "redis://localhost:6379");
        assert_eq!(settings.probe_timeout, Duration::from_secs(3));
        assert_eq!(settings.allowed_hosts, vec!["localhost", "127.0.0.1"]);
        assert_eq!(settings.bcrypt_cost, 12);
        assert!(settings.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_secret_key_is_fatal_outside_debug() {
        let err = Settings::from_vars(&vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("SECRET_KEY")));
    }

    #[test]
    fn test_debug_run_falls_back_to_dev_secret() {
        let settings = Settings::from_vars(&vars(&[("DEBUG", "true")])).unwrap();
        assert!(settings.debug);
        assert_eq!(settings.secret_key, DEBUG_SECRET_KEY);
    }

    #[test]
    fn test_invalid_port_is_fatal() {
        let err = Settings::from_vars(&vars(&[("SECRET_KEY", "k"), ("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { var: "PORT", .. }));
    }

    #[test]
    fn test_invalid_debug_flag_is_fatal() {
        let err = Settings::from_vars(&vars(&[("SECRET_KEY", "k"), ("DEBUG", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { var: "DEBUG", .. }));
    }

    #[test]
    fn test_allowed_hosts_parsing_and_matching() {
        let settings = Settings::from_vars(&vars(&[
            ("SECRET_KEY", "k"),
            ("ALLOWED_HOSTS", "api.finacle.app, Localhost"),
        ]))
        .unwrap();

        assert!(settings.is_host_allowed("api.finacle.app"));
        assert!(settings.is_host_allowed("localhost"));
        assert!(!settings.is_host_allowed("evil.example.com"));
    }

    #[test]
    fn test_wildcard_allows_any_host() {
        let settings =
            Settings::from_vars(&vars(&[("SECRET_KEY", "k"), ("ALLOWED_HOSTS", "*")])).unwrap();
        assert!(settings.is_host_allowed("anything.example.com"));
    }

    #[test]
    fn test_bcrypt_cost_env_defaults() {
        assert_eq!(Environment::Development.default_bcrypt_cost(), 4);
        assert_eq!(Environment::Test.default_bcrypt_cost(), 4);
        assert_eq!(Environment::Staging.default_bcrypt_cost(), 10);
        assert_eq!(Environment::Production.default_bcrypt_cost(), 12);
    }

    #[test]
    fn test_bcrypt_cost_out_of_range_is_fatal() {
        let err = Settings::from_vars(&vars(&[("SECRET_KEY", "k"), ("BCRYPT_COST", "20")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { var: "BCRYPT_COST", .. }));
    }

    #[test]
    fn test_explicit_overrides() {
        let settings = Settings::from_vars(&vars(&[
            ("SECRET_KEY", "k"),
            ("ENVIRONMENT", "staging"),
            ("PORT", "9000"),
            ("WEB_CONCURRENCY", "8"),
            ("PROBE_TIMEOUT_SECONDS", "1"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ]))
        .unwrap();

        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.workers, 8);
        assert_eq!(settings.probe_timeout, Duration::from_secs(1));
        assert_eq!(
            settings.sentry_dsn.as_deref(),
            Some("https://key@sentry.example.com/1")
        );
        assert_eq!(settings.bcrypt_cost, 10);
    }
}
