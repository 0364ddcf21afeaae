pub mod price_table;
pub mod swap;
pub mod token;

// Re-export commonly used types
pub use price_table::PriceTable;
pub use swap::{SwapState, TokenAmounts};
pub use token::{PricedToken, SupportedToken, TokenInfo, TokenSymbol, SUPPORTED_TOKENS};
