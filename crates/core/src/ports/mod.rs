pub mod asset_provider;
pub mod command_handler;

pub use asset_provider::{AssetInfo, AssetProvider, ProviderError};
pub use command_handler::{Command, CommandError, CommandHandler};
