//! Price lookup behind the `QuoteProvider` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::types::quote::Quote;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("quote service returned status {0}")]
    Status(StatusCode),

    #[error("quote service returned unusable price {0}")]
    BadPrice(f64),

    #[error("no quote for held symbol {0}")]
    UnknownHeldSymbol(String),
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Look up `symbol`. `Ok(None)` means the symbol is unknown.
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, QuoteError>;
}

/// Normalise user input to a ticker: trimmed, uppercase, `[A-Z0-9.-]` only.
pub fn normalize_symbol(symbol: &str) -> Option<String> {
    let symbol = symbol.trim().to_uppercase();
    let valid = !symbol.is_empty()
        && symbol.len() <= 16
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    valid.then_some(symbol)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    symbol: String,
    company_name: String,
    latest_price: f64,
}

/// IEX-Cloud-style quote API: `GET {base}/stock/{symbol}/quote?token={key}`.
pub struct HttpQuoteProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpQuoteProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl QuoteProvider for HttpQuoteProvider {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, QuoteError> {
        let Some(symbol) = normalize_symbol(symbol) else {
            return Ok(None);
        };
        let url = format!("{}/stock/{}/quote", self.base_url, symbol);
        debug!("looking up quote for {}", symbol);

        let res = self
            .client
            .get(&url)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await?;
        match res.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => return Err(QuoteError::Status(status)),
            _ => {}
        }

        let body: QuoteResponse = res.json().await?;
        let price = Decimal::from_f64(body.latest_price)
            .filter(|p| p.is_sign_positive() && !p.is_zero())
            .ok_or(QuoteError::BadPrice(body.latest_price))?;
        Ok(Some(Quote {
            symbol: body.symbol.to_uppercase(),
            name: body.company_name,
            price,
        }))
    }
}

/// Fixed price table, for local development and tests. Prices can be moved at runtime.
#[derive(Default)]
pub struct StaticQuoteProvider {
    quotes: RwLock<HashMap<String, Quote>>,
}

impl StaticQuoteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_quote(mut self, symbol: &str, name: &str, price: Decimal) -> Self {
        let symbol = symbol.to_uppercase();
        self.quotes.get_mut().insert(
            symbol.clone(),
            Quote {
                symbol,
                name: name.to_string(),
                price,
            },
        );
        self
    }

    /// Move the price of an existing symbol. Returns false if the symbol is unknown.
    pub async fn set_price(&self, symbol: &str, price: Decimal) -> bool {
        let mut quotes = self.quotes.write().await;
        match quotes.get_mut(&symbol.to_uppercase()) {
            Some(quote) => {
                quote.price = price;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl QuoteProvider for StaticQuoteProvider {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, QuoteError> {
        let Some(symbol) = normalize_symbol(symbol) else {
            return Ok(None);
        };
        Ok(self.quotes.read().await.get(&symbol).cloned())
    }
}
