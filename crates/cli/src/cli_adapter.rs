use error_stack::ResultExt;
use price_explorer_core::application::SwapSession;
use price_explorer_core::ports::command_handler::{Command, CommandError, CommandHandler};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{error, instrument, Instrument};
use tracing_indicatif::span_ext::IndicatifSpanExt;
use tracing_indicatif::style::ProgressStyle;

use crate::display::{render_quote, render_table};

const HELP: &str = "\
Commands:
  usd <amount>   set the USD amount to convert
  from <token>   select the token on the first side
  to <token>     select the token on the second side
  swap           exchange the two selections
  reload         fetch prices again
  show           print the current quote
  tokens         list loaded token prices
  quit           leave";

pub struct CliAdapter {
    session: SwapSession,
}

impl std::fmt::Debug for CliAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliAdapter")
            .field("session", &self.session.state())
            .finish()
    }
}

impl CliAdapter {
    pub fn new(session: SwapSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SwapSession {
        &self.session
    }

    /// Reloads prices behind a spinner. Fails only when no token could be priced at all.
    #[instrument(skip(self))]
    pub async fn load_prices(&mut self) -> error_stack::Result<(), CommandError> {
        let span = tracing::info_span!("loading");
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            span.pb_set_style(&style);
        }
        span.pb_set_message("Loading token prices");

        self.session.reload().instrument(span).await;

        match self.session.state().error() {
            Some(message) if self.session.state().tokens().is_empty() => {
                Err(CommandError::ExecutionFailed {
                    details: message.to_string(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }

    /// Reads commands from stdin until `quit` or end of input.
    pub async fn run_interactive(&mut self) -> error_stack::Result<(), CommandError> {
        if let Err(report) = self.load_prices().await {
            error!("{:?}", report);
        }
        println!("{}", render_quote(self.session.state()));
        println!("Type 'help' for commands.");

        self.run_commands(BufReader::new(tokio::io::stdin())).await
    }

    /// Executes one command per line. A read failure ends the loop with an error.
    pub async fn run_commands<R>(&mut self, reader: R) -> error_stack::Result<(), CommandError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        loop {
            let line = lines
                .next_line()
                .await
                .change_context(CommandError::ExecutionFailed {
                    details: "failed to read command input".to_string(),
                })?;

            let Some(line) = line else {
                break;
            };

            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    eprintln!("{}", e);
                    continue;
                }
            };

            if command == Command::Quit {
                break;
            }

            match self.handle(command).await {
                Ok(output) => println!("{}", output),
                Err(report) => {
                    error!("Command failed: {:?}", report);
                    eprintln!("{}", report.current_context());
                }
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl CommandHandler for CliAdapter {
    #[instrument(skip(self))]
    async fn handle(&mut self, command: Command) -> error_stack::Result<String, CommandError> {
        match command {
            Command::SetUsdAmount(amount) => self.session.set_usd_amount(amount),
            Command::SelectFrom(symbol) => self.session.set_from_token(symbol),
            Command::SelectTo(symbol) => self.session.set_to_token(symbol),
            Command::SwapTokens => self.session.swap_tokens(),
            Command::Reload => self.load_prices().await?,
            Command::Show => {}
            Command::ListTokens => return Ok(render_table(self.session.state().tokens())),
            Command::Help => return Ok(HELP.to_string()),
            Command::Quit => return Ok("Bye".to_string()),
        }

        Ok(render_quote(self.session.state()))
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::task::{Context, Poll};

    use price_explorer_core::domain::{SwapState, TokenSymbol};
    use price_explorer_core::ports::{AssetInfo, AssetProvider, ProviderError};
    use price_explorer_core::TokenDataLoader;

    use super::*;

    /// Input stream whose every read fails.
    struct BrokenInput;

    impl tokio::io::AsyncRead for BrokenInput {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut tokio::io::ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "input closed")))
        }
    }

    /// Prices every token at a fixed USD value derived from its symbol.
    struct StaticProvider;

    fn price_of(symbol: &str) -> f64 {
        match symbol {
            "0xusdc" => 1.0,
            "0xeth" => 2000.0,
            _ => 0.0,
        }
    }

    #[async_trait::async_trait]
    impl AssetProvider for StaticProvider {
        async fn asset_by_symbol(
            &self,
            chain_id: &str,
            symbol: &str,
        ) -> error_stack::Result<AssetInfo, ProviderError> {
            Ok(AssetInfo {
                symbol: symbol.to_string(),
                chain: chain_id.to_string(),
                name: symbol.to_string(),
                address: Some(format!("0x{}", symbol.to_lowercase())),
                decimals: Some(18),
            })
        }

        async fn unit_price(
            &self,
            _chain_id: &str,
            address: &str,
        ) -> error_stack::Result<f64, ProviderError> {
            Ok(price_of(address))
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl AssetProvider for FailingProvider {
        async fn asset_by_symbol(
            &self,
            _chain_id: &str,
            _symbol: &str,
        ) -> error_stack::Result<AssetInfo, ProviderError> {
            Err(ProviderError::HttpError.into())
        }

        async fn unit_price(
            &self,
            _chain_id: &str,
            _address: &str,
        ) -> error_stack::Result<f64, ProviderError> {
            Err(ProviderError::HttpError.into())
        }
    }

    fn adapter(provider: Arc<dyn AssetProvider>) -> CliAdapter {
        let loader = TokenDataLoader::new(provider);
        CliAdapter::new(SwapSession::new(loader, SwapState::default()))
    }

    #[tokio::test]
    async fn test_reload_then_quote() {
        let mut adapter = adapter(Arc::new(StaticProvider));

        adapter.handle(Command::Reload).await.unwrap();
        let output = adapter.handle(Command::SetUsdAmount(100.0)).await.unwrap();

        assert!(output.contains("100"));
        assert!(output.contains("0.05"));
        assert!(output.contains("$2,000.00 per token"));
    }

    #[tokio::test]
    async fn test_select_with_collision_swaps() {
        let mut adapter = adapter(Arc::new(StaticProvider));

        adapter
            .handle(Command::SelectFrom(TokenSymbol::WBTC))
            .await
            .unwrap();
        adapter
            .handle(Command::SelectTo(TokenSymbol::WBTC))
            .await
            .unwrap();

        let state = adapter.session().state();
        assert_eq!(state.from_token(), TokenSymbol::ETH);
        assert_eq!(state.to_token(), TokenSymbol::WBTC);
    }

    #[tokio::test]
    async fn test_reload_with_every_lookup_failing_is_an_error() {
        let mut adapter = adapter(Arc::new(FailingProvider));

        let report = adapter.handle(Command::Reload).await.unwrap_err();

        assert!(matches!(
            report.current_context(),
            CommandError::ExecutionFailed { .. }
        ));
        let state = adapter.session().state();
        assert!(!state.is_loading());
        assert!(state.error().is_some());
    }

    #[tokio::test]
    async fn test_list_tokens_after_reload() {
        let mut adapter = adapter(Arc::new(StaticProvider));
        adapter.handle(Command::Reload).await.unwrap();

        let output = adapter.handle(Command::ListTokens).await.unwrap();

        assert!(output.contains("$1.00"));
        assert!(output.contains("Loaded at"));
    }

    #[tokio::test]
    async fn test_run_commands_applies_each_line_until_quit() {
        let mut adapter = adapter(Arc::new(StaticProvider));
        let input: &[u8] = b"reload\nusd 250\n\nfrom wbtc\nbogus\nquit\nusd 1\n";

        adapter.run_commands(input).await.unwrap();

        let state = adapter.session().state();
        assert_eq!(state.usd_amount(), 250.0);
        assert_eq!(state.from_token(), TokenSymbol::WBTC);
        assert!(!state.tokens().is_empty());
    }

    #[tokio::test]
    async fn test_run_commands_reports_read_failure() {
        let mut adapter = adapter(Arc::new(StaticProvider));

        let report = adapter
            .run_commands(BufReader::new(BrokenInput))
            .await
            .unwrap_err();

        assert!(matches!(
            report.current_context(),
            CommandError::ExecutionFailed { .. }
        ));
    }
}
