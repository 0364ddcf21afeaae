use std::sync::Arc;
use std::time::Duration;

use error_stack::{report, Result, ResultExt};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{instrument, Instrument};

use crate::domain::token::{PricedToken, SupportedToken, TokenInfo, TokenSymbol, SUPPORTED_TOKENS};
use crate::ports::asset_provider::AssetProvider;

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a single token was left out of a load.
#[derive(Error, Debug)]
pub enum TokenLookupError {
    #[error("metadata lookup failed for {symbol}")]
    Metadata { symbol: TokenSymbol },
    #[error("no contract address for {symbol} on chain {chain_id}")]
    MissingAddress {
        symbol: TokenSymbol,
        chain_id: &'static str,
    },
    #[error("price lookup failed for {symbol} at {address}")]
    Price { symbol: TokenSymbol, address: String },
    #[error("price for {symbol} is not a non-negative number: {price}")]
    InvalidPrice { symbol: TokenSymbol, price: f64 },
    #[error("lookup for {symbol} timed out after {timeout:?}")]
    Timeout { symbol: TokenSymbol, timeout: Duration },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("token data load was cancelled")]
    Cancelled,
    #[error("token lookup task failed to complete")]
    Orchestration,
}

/// Fetches metadata and USD price for every supported token.
#[derive(Clone)]
pub struct TokenDataLoader {
    provider: Arc<dyn AssetProvider>,
    lookup_timeout: Duration,
}

impl std::fmt::Debug for TokenDataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDataLoader")
            .field("provider", &"<AssetProvider>")
            .field("lookup_timeout", &self.lookup_timeout)
            .finish()
    }
}

impl TokenDataLoader {
    pub fn new(provider: Arc<dyn AssetProvider>) -> Self {
        Self {
            provider,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Runs one lookup task per supported token and keeps the ones that resolved.
    ///
    /// A failing token is logged and dropped without affecting the others. The call
    /// itself only fails when `cancel` fires or a lookup task dies.
    #[instrument(skip(self, cancel))]
    pub async fn load_all_tokens(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<PricedToken>, LoadError> {
        let mut lookups = JoinSet::new();

        for token in SUPPORTED_TOKENS.iter() {
            let loader = self.clone();
            lookups.spawn(
                async move { (token.symbol, loader.resolve_token(token).await) }
                    .instrument(tracing::info_span!("lookup", symbol = %token.symbol)),
            );
        }

        let mut tokens = Vec::with_capacity(SUPPORTED_TOKENS.len());

        loop {
            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    lookups.abort_all();
                    tracing::info!("Token data load cancelled");
                    return Err(report!(LoadError::Cancelled));
                }
                joined = lookups.join_next() => joined,
            };

            let Some(joined) = joined else {
                break;
            };

            let (symbol, outcome) = joined
                .change_context(LoadError::Orchestration)
                .attach_printable("A token lookup task panicked or was aborted")?;

            match outcome {
                Ok(token) => {
                    tracing::debug!(%symbol, price = token.price_in_usd, "Token resolved");
                    tokens.push(token);
                }
                Err(report) => {
                    tracing::warn!(%symbol, "Dropping token: {:?}", report);
                }
            }
        }

        tracing::info!(
            "Loaded {} of {} supported tokens",
            tokens.len(),
            SUPPORTED_TOKENS.len()
        );

        Ok(tokens)
    }

    /// Metadata first, then price. Either step failing drops the token.
    #[instrument(skip(self, token), fields(symbol = %token.symbol))]
    pub async fn resolve_token(
        &self,
        token: &'static SupportedToken,
    ) -> Result<PricedToken, TokenLookupError> {
        let info = self.resolve_info(token).await?;
        let price_in_usd = self.resolve_price(&info).await?;

        Ok(PricedToken { info, price_in_usd })
    }

    async fn resolve_info(&self, token: &'static SupportedToken) -> Result<TokenInfo, TokenLookupError> {
        let symbol = token.symbol;
        let asset = tokio::time::timeout(
            self.lookup_timeout,
            self.provider
                .asset_by_symbol(token.chain_id, &symbol.to_string()),
        )
        .await
        .change_context(TokenLookupError::Timeout {
            symbol,
            timeout: self.lookup_timeout,
        })?
        .change_context(TokenLookupError::Metadata { symbol })?;

        if !asset.symbol.eq_ignore_ascii_case(&symbol.to_string()) {
            tracing::debug!(%symbol, reported = %asset.symbol, "Provider reported a different symbol");
        }

        let address = asset
            .address
            .filter(|address| !address.is_empty())
            .ok_or_else(|| {
                report!(TokenLookupError::MissingAddress {
                    symbol,
                    chain_id: token.chain_id,
                })
            })?;

        Ok(TokenInfo {
            symbol,
            chain_id: token.chain_id.into(),
            name: asset.name.into(),
            address: address.into(),
            decimals: asset.decimals,
        })
    }

    async fn resolve_price(&self, info: &TokenInfo) -> Result<f64, TokenLookupError> {
        let symbol = info.symbol;
        let price = tokio::time::timeout(
            self.lookup_timeout,
            self.provider.unit_price(&info.chain_id, &info.address),
        )
        .await
        .change_context(TokenLookupError::Timeout {
            symbol,
            timeout: self.lookup_timeout,
        })?
        .change_context(TokenLookupError::Price {
            symbol,
            address: info.address.to_string(),
        })?;

        if !price.is_finite() || price < 0.0 {
            return Err(report!(TokenLookupError::InvalidPrice { symbol, price }));
        }

        Ok(price)
    }
}
