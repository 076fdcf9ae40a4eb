//! Application configuration management.

use chrono_tz::Tz;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Report defaults.
    #[serde(default)]
    pub reporting: ReportingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL for the ERP replica.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Report defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// IANA time zone used to decide what "today" is for the dealership.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Length of the trailing profitability window when no period is given.
    #[serde(default = "default_trailing_months")]
    pub default_trailing_months: u32,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_trailing_months() -> u32 {
    12
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            default_trailing_months: default_trailing_months(),
        }
    }
}

impl ReportingConfig {
    /// Parses the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known IANA zone.
    pub fn tz(&self) -> Result<Tz, config::ConfigError> {
        self.timezone.parse::<Tz>().map_err(|_| {
            config::ConfigError::Message(format!("unknown time zone: {}", self.timezone))
        })
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.reporting.tz()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("TALLY__SERVER__PORT", Some("9090")),
                ("TALLY__DATABASE__URL", Some("postgres://localhost/erp")),
                ("TALLY__REPORTING__TIMEZONE", Some("America/Chicago")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.database.url, "postgres://localhost/erp");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.reporting.tz().unwrap(), chrono_tz::America::Chicago);
                assert_eq!(config.reporting.default_trailing_months, 12);
            },
        );
    }

    #[rstest]
    #[case::valid("America/Chicago", None)]
    #[case::unknown("Mars/Olympus_Mons", Some("unknown time zone: Mars/Olympus_Mons"))]
    fn test_timezone_checked_on_load(#[case] zone: &str, #[case] expected_error: Option<&str>) {
        temp_env::with_vars(
            [
                ("TALLY__SERVER__PORT", Some("9090")),
                ("TALLY__DATABASE__URL", Some("postgres://localhost/erp")),
                ("TALLY__REPORTING__TIMEZONE", Some(zone)),
            ],
            || match (AppConfig::load(), expected_error) {
                (Ok(config), None) => assert_eq!(config.reporting.timezone, zone),
                (Err(err), Some(message)) => assert!(
                    err.to_string().contains(message),
                    "unexpected error: {err}"
                ),
                (result, _) => panic!("unexpected result: {result:?}"),
            },
        );
    }

    #[test]
    fn test_reporting_defaults() {
        let reporting = ReportingConfig::default();
        assert_eq!(reporting.tz().unwrap(), Tz::UTC);
        assert_eq!(reporting.default_trailing_months, 12);
    }
}
