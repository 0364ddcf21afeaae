use std::sync::Arc;
use std::time::Duration;

use error_stack::ResultExt;
use price_explorer_core::{
    adapters::{config::AppConfig, funkit::FunkitApiClient},
    application::{SwapSession, TokenDataLoader},
    domain::SwapState,
    ports::{AssetProvider, CommandError},
};

pub struct ApplicationServiceFactory;

impl ApplicationServiceFactory {
    pub fn create(config: &AppConfig) -> error_stack::Result<SwapSession, CommandError> {
        let provider: Arc<dyn AssetProvider> = Arc::new(
            FunkitApiClient::new(&config.funkit).change_context(CommandError::ExecutionFailed {
                details: "Failed to create Funkit API client".to_string(),
            })?,
        );

        let loader = TokenDataLoader::new(provider)
            .with_lookup_timeout(Duration::from_secs(config.funkit.request_timeout_secs));

        let state = SwapState::new(config.swap.default_from, config.swap.default_to);

        Ok(SwapSession::new(loader, state))
    }
}
