use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed")]
    HttpError,
    #[error("HTTP status error: {0}")]
    HttpStatusError(String),
    #[error("JSON parsing failed")]
    JsonError,
}

/// Asset record as reported by the provider. `address` is absent when the provider
/// knows the symbol but could not map it to a contract on the requested chain.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct AssetInfo {
    pub symbol: String,
    pub chain: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
}

#[async_trait::async_trait]
pub trait AssetProvider: Send + Sync {
    /// Resolves ERC20 metadata by chain and symbol.
    async fn asset_by_symbol(
        &self,
        chain_id: &str,
        symbol: &str,
    ) -> error_stack::Result<AssetInfo, ProviderError>;

    /// Resolves the USD price of one unit of the token at `address`.
    async fn unit_price(
        &self,
        chain_id: &str,
        address: &str,
    ) -> error_stack::Result<f64, ProviderError>;
}
