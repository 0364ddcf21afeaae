use price_explorer_core::domain::{PriceTable, SwapState, TokenAmounts, TokenSymbol};
use price_explorer_core::PricedToken;

const PLACEHOLDER: &str = "---";

fn group_thousands(integer: &str) -> String {
    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }
    grouped
}

/// Token quantity with at most 6 fraction digits. Dust below 0.001 is shown as `< 0.001`.
pub fn format_number(num: f64) -> String {
    if num < 0.001 {
        return "< 0.001".to_string();
    }

    let fixed = format!("{:.6}", num);
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        group_thousands(integer)
    } else {
        format!("{}.{}", group_thousands(integer), fraction)
    }
}

pub fn format_currency(num: f64) -> String {
    let fixed = format!("{:.2}", num.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if num < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(integer), fraction)
}

fn render_side(label: &str, symbol: TokenSymbol, amount: f64, data: Option<&PricedToken>) -> String {
    match data {
        Some(token) => format!(
            "{:<5} {:<5} {:>20}   {} per token",
            label,
            symbol.to_string(),
            format_number(amount),
            format_currency(token.price_in_usd)
        ),
        None => format!(
            "{:<5} {:<5} {:>20}   {} per token",
            label,
            symbol.to_string(),
            PLACEHOLDER,
            PLACEHOLDER
        ),
    }
}

/// Both sides of the swap for the current USD amount, followed by the error line if any.
pub fn render_quote(state: &SwapState) -> String {
    let TokenAmounts {
        from_amount,
        to_amount,
        from_token_data,
        to_token_data,
    } = state.token_amounts();

    let mut lines = vec![
        format!("USD   {}", format_currency(state.usd_amount())),
        render_side("From", state.from_token(), from_amount, from_token_data),
        render_side("To", state.to_token(), to_amount, to_token_data),
    ];

    if let Some(error) = state.error() {
        lines.push(format!("Error: {}", error));
    }

    lines.join("\n")
}

pub fn render_table(table: &PriceTable) -> String {
    let mut lines = Vec::new();

    for symbol in TokenSymbol::all() {
        let line = match table.get(symbol) {
            Some(token) => format!(
                "{:<5} {:<16} chain {:<5} {:>14}   {}",
                symbol.to_string(),
                token.info.name,
                token.info.chain_id,
                format_currency(token.price_in_usd),
                token.info.address
            ),
            None => format!("{:<5} unavailable", symbol.to_string()),
        };
        lines.push(line);
    }

    if let Some(loaded_at) = table.loaded_at() {
        lines.push(format!("Loaded at {}", loaded_at.format("%Y-%m-%d %H:%M:%S UTC")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_dust() {
        assert_eq!(format_number(0.0), "< 0.001");
        assert_eq!(format_number(0.000_9), "< 0.001");
    }

    #[test]
    fn test_format_number_trims_and_groups() {
        assert_eq!(format_number(0.05), "0.05");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(1234567.5), "1,234,567.5");
        assert_eq!(format_number(0.123456789), "0.123457");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1.0), "$1.00");
        assert_eq!(format_currency(2000.0), "$2,000.00");
        assert_eq!(format_currency(60123.456), "$60,123.46");
        assert_eq!(format_currency(-5.5), "-$5.50");
    }

    #[test]
    fn test_render_quote_without_prices_uses_placeholders() {
        let state = SwapState::default();

        let rendered = render_quote(&state);

        assert!(rendered.contains("USDC"));
        assert!(rendered.contains("ETH"));
        assert!(rendered.contains("---"));
    }

    #[test]
    fn test_render_quote_shows_error() {
        let mut state = SwapState::default();
        state.set_error(Some("boom".to_string()));

        assert!(render_quote(&state).ends_with("Error: boom"));
    }

    #[test]
    fn test_render_table_marks_missing_tokens() {
        let rendered = render_table(&PriceTable::default());

        assert!(rendered.contains("WBTC  unavailable"));
        assert!(!rendered.contains("Loaded at"));
    }
}
