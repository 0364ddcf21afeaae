pub const DEFAULT_BASE_URL: &str = "https://api.fun.xyz/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

use serde::{de, Deserialize, Deserializer};

#[derive(serde::Deserialize, Debug, Clone)]
pub struct FunkitConfig {
    #[serde(deserialize_with = "text_or_number")]
    pub api_key: Box<str>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound for a single metadata or price lookup.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Environment overrides are parsed eagerly, so a digits-only key shows up as a number.
fn text_or_number<'de, D>(deserializer: D) -> Result<Box<str>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(text.into()),
        serde_json::Value::Number(number) => Ok(number.to_string().into()),
        other => Err(de::Error::invalid_type(
            de::Unexpected::Other(&other.to_string()),
            &"a string or a number",
        )),
    }
}
