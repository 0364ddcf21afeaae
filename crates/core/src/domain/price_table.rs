use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::token::{PricedToken, TokenSymbol};

/// Prices keyed by symbol. Only symbols that resolved during the last load are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    tokens: HashMap<TokenSymbol, PricedToken>,
    loaded_at: Option<DateTime<Utc>>,
}

impl PriceTable {
    pub fn from_tokens(tokens: impl IntoIterator<Item = PricedToken>) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .map(|token| (token.symbol(), token))
                .collect(),
            loaded_at: Some(Utc::now()),
        }
    }

    pub fn get(&self, symbol: TokenSymbol) -> Option<&PricedToken> {
        self.tokens.get(&symbol)
    }

    pub fn contains(&self, symbol: TokenSymbol) -> bool {
        self.tokens.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// `None` until the table has been produced by a load.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Entries in symbol declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &PricedToken> {
        TokenSymbol::all().filter_map(|symbol| self.tokens.get(&symbol))
    }
}

impl FromIterator<PricedToken> for PriceTable {
    fn from_iter<I: IntoIterator<Item = PricedToken>>(iter: I) -> Self {
        Self::from_tokens(iter)
    }
}
