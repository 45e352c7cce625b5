use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use tracing::warn;

/// Formats an amount in the given ISO currency, e.g. `$1,234.56`.
///
/// Unknown currency codes fall back to USD.
pub fn format_money(amount: Decimal, currency_code: &str) -> String {
    let currency = match iso::find(currency_code) {
        Some(currency) => currency,
        None => {
            warn!("Unknown currency code {}, formatting as USD", currency_code);
            iso::USD
        }
    };
    Money::from_decimal(amount.round_dp(currency.exponent), currency).to_string()
}
