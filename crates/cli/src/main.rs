use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use price_explorer_core::adapters::config::AppConfig;
use price_explorer_core::domain::TokenSymbol;
use price_explorer_core::ports::command_handler::{parse_symbol, parse_usd_amount, Command};
use price_explorer_core::ports::CommandHandler;
use price_explorer_core::prettyprint::PrettyFormatter;
use tracing::{error, info, instrument};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

mod application_service_factory;
mod cli_adapter;
mod display;

use application_service_factory::ApplicationServiceFactory;
use cli_adapter::CliAdapter;

#[derive(Parser, Debug)]
#[command(name = "price-explorer", version, about = "Live USD to token price explorer")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// File receiving a plain copy of the log
    #[arg(long, global = true, default_value = "price_explorer.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Convert a USD amount into both selected tokens
    Quote {
        #[arg(long, value_parser = parse_usd_amount)]
        usd: f64,
        #[arg(long, value_parser = parse_symbol)]
        from: Option<TokenSymbol>,
        #[arg(long, value_parser = parse_symbol)]
        to: Option<TokenSymbol>,
        /// Exchange the two selections before quoting
        #[arg(long)]
        swap: bool,
    },
    /// List the price of every supported token
    Tokens,
    /// Read commands from stdin
    Interactive,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_tracing(&cli)?;
    setup_panic_hook();

    info!("Starting price-explorer CLI");

    match run(cli.command.unwrap_or(CliCommand::Interactive)).await {
        Ok(_) => {
            info!("CLI execution completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("CLI execution failed: {}", e);
            Err(e)
        }
    }
}

#[instrument]
async fn run(command: CliCommand) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|report| format!("{:?}", report))?;
    let session =
        ApplicationServiceFactory::create(&config).map_err(|report| format!("{:?}", report))?;
    let mut adapter = CliAdapter::new(session);

    match command {
        CliCommand::Quote {
            usd,
            from,
            to,
            swap,
        } => {
            let mut commands = vec![Command::SetUsdAmount(usd)];
            commands.extend(from.map(Command::SelectFrom));
            commands.extend(to.map(Command::SelectTo));
            if swap {
                commands.push(Command::SwapTokens);
            }

            adapter
                .load_prices()
                .await
                .map_err(|report| report.current_context().to_string())?;

            let mut output = String::new();
            for command in commands {
                output = adapter
                    .handle(command)
                    .await
                    .map_err(|report| format!("{:?}", report))?;
            }
            println!("{}", output);
        }
        CliCommand::Tokens => {
            adapter
                .load_prices()
                .await
                .map_err(|report| report.current_context().to_string())?;
            let output = adapter
                .handle(Command::ListTokens)
                .await
                .map_err(|report| format!("{:?}", report))?;
            println!("{}", output);
        }
        CliCommand::Interactive => {
            adapter
                .run_interactive()
                .await
                .map_err(|report| format!("{:?}", report))?;
        }
    }

    Ok(())
}

fn setup_tracing(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let indicatif_layer = IndicatifLayer::new();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(true))
        .with_writer(indicatif_layer.get_stderr_writer());

    let log_file_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(false))
        .with_writer(std::fs::File::create(&cli.log_file)?)
        .with_ansi(false);

    Registry::default()
        .with(
            tracing_subscriber::filter::Targets::new()
                .with_target("price_explorer", level)
                .with_target("price_explorer_core", level),
        )
        .with(indicatif_layer)
        .with(log_file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}

fn setup_panic_hook() {
    tracing::trace!("Setting panic hook");
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
    }));
}
