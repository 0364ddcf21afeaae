use crate::domain::token::TokenSymbol;

#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapConfig {
    #[serde(default = "default_from")]
    pub default_from: TokenSymbol,
    #[serde(default = "default_to")]
    pub default_to: TokenSymbol,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            default_from: default_from(),
            default_to: default_to(),
        }
    }
}

fn default_from() -> TokenSymbol {
    TokenSymbol::USDC
}

fn default_to() -> TokenSymbol {
    TokenSymbol::ETH
}
