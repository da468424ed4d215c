use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Buy,
    Sell,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Buy => "buy",
            TransactionKind::Sell => "sell",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "buy" => Some(TransactionKind::Buy),
            "sell" => Some(TransactionKind::Sell),
            _ => None,
        }
    }
}

/// One completed buy or sell. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub symbol: String,
    pub price: Decimal,
    pub shares: i64,
    pub kind: TransactionKind,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        symbol: &str,
        price: Decimal,
        shares: i64,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            symbol: symbol.to_string(),
            price,
            shares,
            kind,
            timestamp: Utc::now(),
        }
    }

    /// Cash moved by this transaction: `price * shares`. Panics on overflow; the
    /// stores use `checked_total`.
    pub fn total(&self) -> Decimal {
        self.price * Decimal::from(self.shares)
    }

    pub fn checked_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.shares))
    }
}
