use super::price_table::PriceTable;
use super::token::{PricedToken, TokenSymbol};

/// Equivalent amount of tokens for a USD amount. A zero price yields zero instead of infinity.
pub fn calculate_token_amount(price_in_usd: f64, usd_amount: f64) -> f64 {
    if price_in_usd > 0.0 {
        usd_amount / price_in_usd
    } else {
        0.0
    }
}

pub fn calculate_usd_value(amount: f64, price_in_usd: f64) -> f64 {
    amount * price_in_usd
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwapState {
    usd_amount: f64,
    from_token: TokenSymbol,
    to_token: TokenSymbol,
    is_loading: bool,
    error: Option<String>,
    tokens: PriceTable,
}

impl Default for SwapState {
    fn default() -> Self {
        Self::new(TokenSymbol::USDC, TokenSymbol::ETH)
    }
}

impl SwapState {
    pub fn new(from_token: TokenSymbol, to_token: TokenSymbol) -> Self {
        Self {
            usd_amount: 0.0,
            from_token,
            to_token,
            is_loading: false,
            error: None,
            tokens: PriceTable::default(),
        }
    }

    pub fn usd_amount(&self) -> f64 {
        self.usd_amount
    }

    pub fn from_token(&self) -> TokenSymbol {
        self.from_token
    }

    pub fn to_token(&self) -> TokenSymbol {
        self.to_token
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn tokens(&self) -> &PriceTable {
        &self.tokens
    }

    /// Accepted as-is; sanitizing the input is the caller's job.
    pub fn set_usd_amount(&mut self, amount: f64) {
        self.usd_amount = amount;
    }

    pub fn set_from_token(&mut self, token: TokenSymbol) {
        if token == self.to_token {
            self.to_token = self.from_token;
        }
        self.from_token = token;
    }

    pub fn set_to_token(&mut self, token: TokenSymbol) {
        if token == self.from_token {
            self.from_token = self.to_token;
        }
        self.to_token = token;
    }

    pub fn swap_tokens(&mut self) {
        std::mem::swap(&mut self.from_token, &mut self.to_token);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn set_tokens(&mut self, tokens: PriceTable) {
        self.tokens = tokens;
    }

    /// Recomputed from the current state on every call.
    pub fn token_amounts(&self) -> TokenAmounts<'_> {
        let from_token_data = self.tokens.get(self.from_token);
        let to_token_data = self.tokens.get(self.to_token);

        TokenAmounts {
            from_amount: self.derive_amount(from_token_data),
            to_amount: self.derive_amount(to_token_data),
            from_token_data,
            to_token_data,
        }
    }

    fn derive_amount(&self, token: Option<&PricedToken>) -> f64 {
        token
            .map(|t| calculate_token_amount(t.price_in_usd, self.usd_amount))
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenAmounts<'a> {
    pub from_amount: f64,
    pub to_amount: f64,
    pub from_token_data: Option<&'a PricedToken>,
    pub to_token_data: Option<&'a PricedToken>,
}
