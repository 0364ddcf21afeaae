use config::{Config, Environment, File};
use error_stack::{Result, ResultExt};
use serde::de::IntoDeserializer;
use serde::Deserialize;
use serde_path_to_error::{Deserializer as PathDeserializer, Segment, Track};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "Config";
pub const ENV_PREFIX: &str = "PRICE_EXPLORER";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration sources")]
    ReadError,
    #[error("invalid configuration at '{path}'")]
    InvalidField { path: String },
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub funkit: super::funkit_config::FunkitConfig,
    #[serde(default)]
    pub swap: super::swap_config::SwapConfig,
}

impl AppConfig {
    /// Reads the optional config file at `CONFIG_PATH` (or `Config`), overlaid by
    /// `PRICE_EXPLORER__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .change_context(ConfigError::ReadError)
            .attach_printable_lazy(|| format!("Config file: {}", config_path))?;

        let value = config
            .try_deserialize::<serde_json::Value>()
            .change_context(ConfigError::ReadError)?;

        Self::from_value(value).attach_printable_lazy(|| format!("Config file: {}", config_path))
    }

    fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let mut track = Track::new();
        let path_de = PathDeserializer::new(value.into_deserializer(), &mut track);

        let config = AppConfig::deserialize(path_de).map_err(|e| {
            let path = field_path(track);
            error_stack::Report::new(ConfigError::InvalidField { path })
                .attach_printable(e.to_string())
                .attach_printable(
                    "Make sure all required fields are present in the configuration file",
                )
        })?;

        if config.swap.default_from == config.swap.default_to {
            return Err(error_stack::Report::new(ConfigError::InvalidField {
                path: "swap.default_to".to_string(),
            })
            .attach_printable(format!(
                "default_to must differ from default_from ({})",
                config.swap.default_from
            )));
        }

        Ok(config)
    }
}

fn field_path(track: Track) -> String {
    track
        .path()
        .iter()
        .map(|seg| match seg {
            Segment::Seq { index } => format!("[{}]", index),
            Segment::Map { key } => format!(".{}", key),
            Segment::Enum { variant } => format!("::{}", variant),
            Segment::Unknown => String::from("<?>"),
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::config::funkit_config::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
    use crate::domain::token::TokenSymbol;
    use serde_json::json;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_value(json!({ "funkit": { "api_key": "abc" } })).unwrap();

        assert_eq!(&*config.funkit.api_key, "abc");
        assert_eq!(config.funkit.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            config.funkit.request_timeout_secs,
            DEFAULT_REQUEST_TIMEOUT_SECS
        );
        assert_eq!(config.swap.default_from, TokenSymbol::USDC);
        assert_eq!(config.swap.default_to, TokenSymbol::ETH);
    }

    #[test]
    fn test_full_config() {
        let config = AppConfig::from_value(json!({
            "funkit": {
                "api_key": "abc",
                "base_url": "http://localhost:8080",
                "request_timeout_secs": 3
            },
            "swap": { "default_from": "WBTC", "default_to": "USDT" }
        }))
        .unwrap();

        assert_eq!(config.funkit.base_url, "http://localhost:8080");
        assert_eq!(config.funkit.request_timeout_secs, 3);
        assert_eq!(config.swap.default_from, TokenSymbol::WBTC);
        assert_eq!(config.swap.default_to, TokenSymbol::USDT);
    }

    #[test]
    fn test_missing_api_key_reports_path() {
        let report = AppConfig::from_value(json!({ "funkit": {} })).unwrap_err();

        assert!(matches!(
            report.current_context(),
            ConfigError::InvalidField { .. }
        ));
    }

    #[test]
    fn test_invalid_symbol_reports_field_path() {
        let report = AppConfig::from_value(json!({
            "funkit": { "api_key": "abc" },
            "swap": { "default_from": "DOGE" }
        }))
        .unwrap_err();

        match report.current_context() {
            ConfigError::InvalidField { path } => assert!(path.starts_with("swap.default_from")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_identical_default_tokens_are_rejected() {
        let report = AppConfig::from_value(json!({
            "funkit": { "api_key": "abc" },
            "swap": { "default_from": "ETH", "default_to": "ETH" }
        }))
        .unwrap_err();

        match report.current_context() {
            ConfigError::InvalidField { path } => assert_eq!(path, "swap.default_to"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_matching_implicit_default_to_is_rejected() {
        let report = AppConfig::from_value(json!({
            "funkit": { "api_key": "abc" },
            "swap": { "default_from": "ETH" }
        }))
        .unwrap_err();

        assert!(matches!(
            report.current_context(),
            ConfigError::InvalidField { .. }
        ));
    }

    #[test]
    fn test_default_tokens_parse_case_insensitively() {
        let config = AppConfig::from_value(json!({
            "funkit": { "api_key": "abc" },
            "swap": { "default_from": "usdc", "default_to": "Wbtc" }
        }))
        .unwrap();

        assert_eq!(config.swap.default_from, TokenSymbol::USDC);
        assert_eq!(config.swap.default_to, TokenSymbol::WBTC);
    }

    #[test]
    fn test_numeric_api_key_is_kept_as_text() {
        // Environment values go through `try_parsing`, so a digits-only key arrives as a number.
        let config =
            AppConfig::from_value(json!({ "funkit": { "api_key": 1234567890 } })).unwrap();

        assert_eq!(&*config.funkit.api_key, "1234567890");
    }

    #[test]
    fn test_api_key_of_wrong_type_reports_path() {
        let report =
            AppConfig::from_value(json!({ "funkit": { "api_key": ["a", "b"] } })).unwrap_err();

        match report.current_context() {
            ConfigError::InvalidField { path } => assert_eq!(path, "funkit.api_key"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
