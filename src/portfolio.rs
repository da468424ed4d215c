//! Portfolio valuation: cash plus every holding marked at its current quote.
//! `value_portfolio` is pure and testable without HTTP.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::AppError;
use crate::quotes::{QuoteError, QuoteProvider};
use crate::store::Store;
use crate::types::holding::Holding;
use crate::types::quote::Quote;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedHolding {
    pub symbol: String,
    pub name: String,
    pub shares: i64,
    pub price: Decimal,
    /// `shares * price`
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Portfolio {
    pub cash: Decimal,
    pub holdings: Vec<PricedHolding>,
    /// `cash + Σ total`
    pub grand_total: Decimal,
}

/// Mark each holding at its quote and sum everything up.
pub fn value_portfolio(cash: Decimal, priced: Vec<(Holding, Quote)>) -> Portfolio {
    let holdings: Vec<PricedHolding> = priced
        .into_iter()
        .map(|(holding, quote)| PricedHolding {
            total: quote.price * Decimal::from(holding.shares),
            symbol: holding.symbol,
            name: quote.name,
            shares: holding.shares,
            price: quote.price,
        })
        .collect();
    let grand_total = holdings.iter().fold(cash, |acc, h| acc + h.total);
    Portfolio {
        cash,
        holdings,
        grand_total,
    }
}

/// Load the user's cash and holdings and price them. A held symbol the quote
/// service no longer knows is an upstream failure.
pub async fn load_portfolio(
    store: &dyn Store,
    quotes: &dyn QuoteProvider,
    user_id: Uuid,
) -> Result<Portfolio, AppError> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or(AppError::SessionExpired)?;
    let holdings = store.list_holdings(user_id).await?;

    let mut priced = Vec::with_capacity(holdings.len());
    for holding in holdings {
        let quote = quotes
            .lookup(&holding.symbol)
            .await?
            .ok_or_else(|| QuoteError::UnknownHeldSymbol(holding.symbol.clone()))?;
        priced.push((holding, quote));
    }
    Ok(value_portfolio(user.cash, priced))
}
