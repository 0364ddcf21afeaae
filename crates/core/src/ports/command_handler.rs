use std::str::FromStr;

use thiserror::Error;

use crate::domain::token::TokenSymbol;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid command: {details}")]
    InvalidCommand { details: String },
    #[error("Command execution failed: {details}")]
    ExecutionFailed { details: String },
}

impl CommandError {
    pub fn invalid<S: Into<String>>(details: S) -> Self {
        CommandError::InvalidCommand {
            details: details.into(),
        }
    }
}

/// Operations a front-end can issue against a swap session.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetUsdAmount(f64),
    SelectFrom(TokenSymbol),
    SelectTo(TokenSymbol),
    SwapTokens,
    Reload,
    Show,
    ListTokens,
    Help,
    Quit,
}

/// Rejects negative and non-finite amounts before they reach the session.
pub fn parse_usd_amount(input: &str) -> Result<f64, CommandError> {
    let amount = input
        .trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| CommandError::invalid(format!("'{}' is not a number", input)))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(CommandError::invalid(format!(
            "USD amount must be a non-negative number, got '{}'",
            input
        )));
    }

    Ok(amount)
}

pub fn parse_symbol(input: &str) -> Result<TokenSymbol, CommandError> {
    input.trim().parse::<TokenSymbol>().map_err(|_| {
        let supported = TokenSymbol::all()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        CommandError::invalid(format!(
            "Unsupported token '{}'. Supported tokens: {}",
            input, supported
        ))
    })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| CommandError::invalid("Empty command"))?
            .to_lowercase();
        let argument = parts.next();

        let require = |what: &str| {
            argument.ok_or_else(|| CommandError::invalid(format!("'{}' requires {}", name, what)))
        };

        match name.as_str() {
            "usd" | "amount" => Ok(Command::SetUsdAmount(parse_usd_amount(require(
                "an amount",
            )?)?)),
            "from" => Ok(Command::SelectFrom(parse_symbol(require("a token")?)?)),
            "to" => Ok(Command::SelectTo(parse_symbol(require("a token")?)?)),
            "swap" => Ok(Command::SwapTokens),
            "reload" => Ok(Command::Reload),
            "show" => Ok(Command::Show),
            "tokens" | "list" => Ok(Command::ListTokens),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::invalid(format!("Unknown command '{}'", other))),
        }
    }
}

#[async_trait::async_trait]
pub trait CommandHandler: Send {
    async fn handle(&mut self, command: Command) -> error_stack::Result<String, CommandError>;
}
