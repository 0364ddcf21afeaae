use error_stack::Result;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::application::loader::{LoadError, TokenDataLoader};
use crate::domain::price_table::PriceTable;
use crate::domain::swap::{SwapState, TokenAmounts};
use crate::domain::token::{PricedToken, TokenSymbol};

pub const NO_TOKENS_LOADED: &str = "Failed to load token data: no supported token could be priced";

/// Handle for one load cycle. Only the most recently started ticket may write the table.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    cancel: CancellationToken,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Swap state for one user session plus the bookkeeping of its load cycles.
#[derive(Debug)]
pub struct SwapSession {
    state: SwapState,
    loader: TokenDataLoader,
    generation: u64,
    active_load: Option<CancellationToken>,
}

impl SwapSession {
    pub fn new(loader: TokenDataLoader, state: SwapState) -> Self {
        Self {
            state,
            loader,
            generation: 0,
            active_load: None,
        }
    }

    pub fn state(&self) -> &SwapState {
        &self.state
    }

    pub fn token_amounts(&self) -> TokenAmounts<'_> {
        self.state.token_amounts()
    }

    pub fn loader(&self) -> &TokenDataLoader {
        &self.loader
    }

    pub fn set_usd_amount(&mut self, amount: f64) {
        self.state.set_usd_amount(amount);
    }

    pub fn set_from_token(&mut self, token: TokenSymbol) {
        self.state.set_from_token(token);
    }

    pub fn set_to_token(&mut self, token: TokenSymbol) {
        self.state.set_to_token(token);
    }

    pub fn swap_tokens(&mut self) {
        self.state.swap_tokens();
    }

    /// Cancels the load in flight, if any, and marks the session as loading.
    pub fn begin_load(&mut self) -> LoadTicket {
        if let Some(previous) = self.active_load.take() {
            tracing::debug!(generation = self.generation, "Cancelling superseded load");
            previous.cancel();
        }

        self.generation += 1;
        let cancel = CancellationToken::new();
        self.active_load = Some(cancel.clone());

        self.state.set_loading(true);
        self.state.set_error(None);

        LoadTicket {
            generation: self.generation,
            cancel,
        }
    }

    /// Applies the outcome of a load. Returns `false` and leaves the state untouched when
    /// `ticket` was superseded by a later `begin_load`.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        outcome: Result<Vec<PricedToken>, LoadError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "Ignoring result of superseded load"
            );
            return false;
        }

        match outcome {
            Ok(tokens) => {
                let table = PriceTable::from_tokens(tokens);
                if table.is_empty() {
                    tracing::error!("{}", NO_TOKENS_LOADED);
                    self.state.set_error(Some(NO_TOKENS_LOADED.to_string()));
                }
                self.state.set_tokens(table);
            }
            Err(report) => {
                tracing::error!("Token data load failed: {:?}", report);
                self.state
                    .set_error(Some(format!("Failed to load token data: {}", report.current_context())));
            }
        }

        self.active_load = None;
        self.state.set_loading(false);
        true
    }

    /// Loads the price table and replaces it wholesale.
    ///
    /// The session stays exclusively borrowed until the load finishes, so loads started
    /// this way run one after another. A caller that needs a newer load to supersede one
    /// still in flight drives it through `begin_load` and `complete_load` instead.
    #[instrument(skip(self))]
    pub async fn reload(&mut self) {
        let ticket = self.begin_load();
        let outcome = self
            .loader
            .load_all_tokens(ticket.cancellation_token())
            .await;
        self.complete_load(&ticket, outcome);
    }
}
