//! Pricing API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file, when present, is loaded first by `main`.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use bobina_core::tax::StateTaxPolicy;
use bobina_core::validation::validate_state_code;
use bobina_core::Percent;
use rust_decimal::Decimal;

/// Pricing API configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Interface to bind
    pub http_host: String,

    /// HTTP server port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Allowed CORS origins; `["*"]` allows any origin
    pub cors_origins: Vec<String>,

    /// Fail quotes when the configuration row is missing
    pub strict_configuration: bool,

    /// ICMS selection for buyers with a state registration
    pub state_tax_policy: StateTaxPolicy,

    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (environment, test maps).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = ApiConfig {
            http_host: var("HTTP_HOST", "0.0.0.0"),

            http_port: var("HTTP_PORT", "5000")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: var("DATABASE_PATH", "./data/bobina.db"),

            cors_origins: var("CORS_ORIGINS", "*")
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),

            strict_configuration: var("STRICT_CONFIGURATION", "false")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STRICT_CONFIGURATION".to_string()))?,

            state_tax_policy: parse_policy(
                &var("REGISTERED_BUYER_POLICY", "material_rate"),
                &var("INTERSTATE_RATE", "4"),
                &var("ORIGIN_STATE", "SP"),
            )?,

            log_level: var("LOG_LEVEL", "info"),
        };

        if config.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("DATABASE_PATH".to_string()));
        }

        Ok(config)
    }

    /// Address the HTTP server binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.http_host, self.http_port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("HTTP_HOST".to_string()))
    }
}

fn parse_policy(kind: &str, rate: &str, origin: &str) -> Result<StateTaxPolicy, ConfigError> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "material_rate" => Ok(StateTaxPolicy::MaterialRate),
        "interstate" => {
            let rate = Decimal::from_str(rate.trim())
                .ok()
                .filter(|r| !r.is_sign_negative())
                .ok_or_else(|| ConfigError::InvalidValue("INTERSTATE_RATE".to_string()))?;
            let origin_state = validate_state_code(origin)
                .map_err(|_| ConfigError::InvalidValue("ORIGIN_STATE".to_string()))?;

            Ok(StateTaxPolicy::Interstate {
                rate: Percent::new(rate),
                origin_state,
            })
        }
        _ => Err(ConfigError::InvalidValue(
            "REGISTERED_BUYER_POLICY".to_string(),
        )),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.http_host, "0.0.0.0");
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.database_path, "./data/bobina.db");
        assert_eq!(config.cors_origins, vec!["*"]);
        assert!(!config.strict_configuration);
        assert_eq!(config.state_tax_policy, StateTaxPolicy::MaterialRate);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.socket_addr().unwrap().port(), 5000);
    }

    #[test]
    fn test_interstate_policy() {
        let config = load(&[
            ("REGISTERED_BUYER_POLICY", "interstate"),
            ("INTERSTATE_RATE", "7"),
            ("ORIGIN_STATE", "mg"),
        ])
        .unwrap();

        assert_eq!(
            config.state_tax_policy,
            StateTaxPolicy::Interstate {
                rate: Percent::new(dec!(7)),
                origin_state: "MG".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("HTTP_PORT", "http")]),
            Err(ConfigError::InvalidValue(key)) if key == "HTTP_PORT"
        ));
        assert!(load(&[("STRICT_CONFIGURATION", "maybe")]).is_err());
        assert!(load(&[("REGISTERED_BUYER_POLICY", "other")]).is_err());
        assert!(load(&[
            ("REGISTERED_BUYER_POLICY", "interstate"),
            ("ORIGIN_STATE", "Sao Paulo"),
        ])
        .is_err());
        assert!(matches!(
            load(&[("DATABASE_PATH", " ")]),
            Err(ConfigError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_cors_list() {
        let config = load(&[("CORS_ORIGINS", "http://a.test, http://b.test,")]).unwrap();
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }
}
