// Tokens are upper case acronyms on the crypto space
#![allow(clippy::upper_case_acronyms)]

use strum::{EnumIter, EnumString, IntoEnumIterator};

/// Closed set of tokens the explorer knows how to price.
#[derive(
    strum::Display,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(try_from = "String")]
pub enum TokenSymbol {
    USDC,
    USDT,
    ETH,
    WBTC,
}

impl TokenSymbol {
    pub fn all() -> impl Iterator<Item = TokenSymbol> {
        TokenSymbol::iter()
    }

    pub fn supported(&self) -> &'static SupportedToken {
        match self {
            TokenSymbol::USDC => &SUPPORTED_TOKENS[0],
            TokenSymbol::USDT => &SUPPORTED_TOKENS[1],
            TokenSymbol::ETH => &SUPPORTED_TOKENS[2],
            TokenSymbol::WBTC => &SUPPORTED_TOKENS[3],
        }
    }
}

impl TryFrom<String> for TokenSymbol {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedToken {
    pub symbol: TokenSymbol,
    pub chain_id: &'static str,
    pub name: &'static str,
}

pub static SUPPORTED_TOKENS: [SupportedToken; 4] = [
    SupportedToken {
        symbol: TokenSymbol::USDC,
        chain_id: "1",
        name: "USD Coin",
    },
    SupportedToken {
        symbol: TokenSymbol::USDT,
        chain_id: "137",
        name: "Tether USD",
    },
    SupportedToken {
        symbol: TokenSymbol::ETH,
        chain_id: "8453",
        name: "Ethereum",
    },
    SupportedToken {
        symbol: TokenSymbol::WBTC,
        chain_id: "1",
        name: "Wrapped Bitcoin",
    },
];

/// Metadata of a token whose contract address was resolved by the asset provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub symbol: TokenSymbol,
    pub chain_id: Box<str>,
    pub name: Box<str>,
    pub address: Box<str>,
    pub decimals: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedToken {
    #[serde(flatten)]
    pub info: TokenInfo,
    pub price_in_usd: f64,
}

impl PricedToken {
    pub fn symbol(&self) -> TokenSymbol {
        self.info.symbol
    }
}
