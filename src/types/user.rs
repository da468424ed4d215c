use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cash a freshly registered user starts with.
pub const STARTING_CASH: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 2);

/// Ceiling on a single cash deposit (1,000,000,000.00).
pub const MAX_DEPOSIT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Ceiling on any account balance (1,000,000,000,000,000.00). Keeps balances well
/// inside `Decimal` range so arithmetic and column decoding never overflow.
pub const MAX_CASH: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// A registered account. `username` is always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub cash: Decimal,
}
