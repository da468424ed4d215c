use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current price information for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
}
