//! Form bodies and field parsing. Missing fields deserialize as empty strings so
//! validation, not the extractor, decides what the user sees.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::user::MAX_DEPOSIT;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirmation: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuoteForm {
    pub symbol: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TradeForm {
    pub symbol: String,
    pub shares: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CashForm {
    pub cash: String,
}

/// Usernames are case-insensitive: trimmed and stored lowercase.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// A share count: ASCII digits only, at least 1.
pub fn parse_shares(input: &str) -> Option<i64> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse::<i64>().ok().filter(|&n| n >= 1)
}

/// A cash amount: any decimal, rounded to cents, positive after rounding and no
/// more than `MAX_DEPOSIT`.
pub fn parse_cash(input: &str) -> Option<Decimal> {
    let amount = Decimal::from_str(input.trim()).ok()?.round_dp(2);
    (amount > Decimal::ZERO && amount <= MAX_DEPOSIT).then_some(amount)
}
