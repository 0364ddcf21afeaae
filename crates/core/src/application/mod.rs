pub mod loader;
pub mod session;

pub use loader::{LoadError, TokenDataLoader, TokenLookupError};
pub use session::{LoadTicket, SwapSession};
