use std::time::Duration;

use error_stack::{Result, ResultExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::adapters::config::funkit_config::FunkitConfig;
use crate::ports::asset_provider::{AssetInfo, AssetProvider, ProviderError};

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceInfoResponse {
    pub unit_price: f64,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
}

/// Client for the Funkit asset API. Every request carries the static API key.
#[derive(Debug, Clone)]
pub struct FunkitApiClient {
    client: Client,
    base_url: String,
    api_key: Box<str>,
}

impl FunkitApiClient {
    pub fn new(config: &FunkitConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .change_context(ProviderError::HttpError)
            .attach_printable("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn asset_url(&self, chain_id: &str, symbol: &str) -> String {
        format!("{}/asset/erc20/{}/{}", self.base_url, chain_id, symbol)
    }

    fn price_url(&self, chain_id: &str, address: &str) -> String {
        format!("{}/asset/erc20/price/{}/{}", self.base_url, chain_id, address)
    }

    async fn fetch_and_deserialize<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &*self.api_key)
            .send()
            .await
            .change_context(ProviderError::HttpError)
            .attach_printable_lazy(|| format!("URL: {}", url))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .change_context(ProviderError::HttpError)
            .attach_printable("Failed to get response text")
            .attach_printable_lazy(|| format!("URL: {}", url))?;

        if !status.is_success() {
            return Err(ProviderError::HttpStatusError(format!(
                "HTTP error {}: {}",
                status, text
            ))
            .into());
        }

        tracing::debug!(response = %text, "Response OK {}", status);

        parse_response(&text).attach_printable_lazy(|| format!("URL: {}", url))
    }
}

fn parse_response<T: DeserializeOwned>(text: &str) -> Result<T, ProviderError> {
    serde_json::from_str(text)
        .change_context(ProviderError::JsonError)
        .attach_printable_lazy(|| format!("Response: {}", text))
}

#[async_trait::async_trait]
impl AssetProvider for FunkitApiClient {
    #[instrument(skip(self))]
    async fn asset_by_symbol(
        &self,
        chain_id: &str,
        symbol: &str,
    ) -> Result<AssetInfo, ProviderError> {
        let url = self.asset_url(chain_id, symbol);
        self.fetch_and_deserialize(&url).await
    }

    #[instrument(skip(self))]
    async fn unit_price(&self, chain_id: &str, address: &str) -> Result<f64, ProviderError> {
        let url = self.price_url(chain_id, address);
        let price: PriceInfoResponse = self.fetch_and_deserialize(&url).await?;
        Ok(price.unit_price)
    }
}
