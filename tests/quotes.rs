//! Quote providers: the HTTP client against a mock quote service, and the static table.

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use paper_broker::quotes::{
    HttpQuoteProvider, QuoteError, QuoteProvider, StaticQuoteProvider, normalize_symbol,
};
use rust_decimal_macros::dec;
use serde_json::json;

const API_KEY: &str = "test-key";

async fn mock_quote(
    Path(symbol): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if params.get("token").map(String::as_str) != Some(API_KEY) {
        return StatusCode::FORBIDDEN.into_response();
    }
    match symbol.as_str() {
        "AAPL" => Json(json!({
            "symbol": "AAPL",
            "companyName": "Apple Inc.",
            "latestPrice": 187.25,
        }))
        .into_response(),
        "FREE" => Json(json!({
            "symbol": "FREE",
            "companyName": "Free Lunch Ltd",
            "latestPrice": 0.0,
        }))
        .into_response(),
        "BOOM" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Spawn the mock quote service and return its base URL.
async fn spawn_quote_service() -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/stock/{symbol}/quote", get(mock_quote));
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/", addr), handle)
}

#[tokio::test]
async fn http_provider_parses_known_symbol() {
    let (base_url, _handle) = spawn_quote_service().await;
    let provider = HttpQuoteProvider::new(base_url, API_KEY);

    let quote = provider.lookup(" aapl ").await.unwrap().unwrap();

    assert_eq!(quote.symbol, "AAPL");
    assert_eq!(quote.name, "Apple Inc.");
    assert_eq!(quote.price, dec!(187.25));
}

#[tokio::test]
async fn http_provider_unknown_symbol_is_none() {
    let (base_url, _handle) = spawn_quote_service().await;
    let provider = HttpQuoteProvider::new(base_url, API_KEY);

    assert!(provider.lookup("ZZZZ").await.unwrap().is_none());
    assert!(provider.lookup("../admin").await.unwrap().is_none());
    assert!(provider.lookup("").await.unwrap().is_none());
}

#[tokio::test]
async fn http_provider_surfaces_upstream_failures() {
    let (base_url, _handle) = spawn_quote_service().await;

    let provider = HttpQuoteProvider::new(base_url.clone(), API_KEY);
    let err = provider.lookup("BOOM").await.unwrap_err();
    assert!(matches!(err, QuoteError::Status(s) if s.as_u16() == 500));

    let bad_key = HttpQuoteProvider::new(base_url, "wrong-key");
    let err = bad_key.lookup("AAPL").await.unwrap_err();
    assert!(matches!(err, QuoteError::Status(s) if s.as_u16() == 403));
}

#[tokio::test]
async fn http_provider_rejects_non_positive_price() {
    let (base_url, _handle) = spawn_quote_service().await;
    let provider = HttpQuoteProvider::new(base_url, API_KEY);

    let err = provider.lookup("FREE").await.unwrap_err();

    assert!(matches!(err, QuoteError::BadPrice(_)));
}

#[tokio::test]
async fn static_provider_lookup_and_price_moves() {
    let provider = StaticQuoteProvider::new().with_quote("aapl", "Apple Inc.", dec!(100));

    let quote = provider.lookup("AaPl").await.unwrap().unwrap();
    assert_eq!(quote.symbol, "AAPL");
    assert_eq!(quote.price, dec!(100));

    assert!(provider.set_price("AAPL", dec!(120)).await);
    assert!(!provider.set_price("MSFT", dec!(1)).await);
    assert_eq!(provider.lookup("AAPL").await.unwrap().unwrap().price, dec!(120));
    assert!(provider.lookup("MSFT").await.unwrap().is_none());
}

#[test]
fn normalize_symbol_uppercases_and_filters() {
    assert_eq!(normalize_symbol(" brk.b "), Some("BRK.B".to_string()));
    assert_eq!(normalize_symbol("rds-a"), Some("RDS-A".to_string()));
    assert_eq!(normalize_symbol(""), None);
    assert_eq!(normalize_symbol("A B"), None);
    assert_eq!(normalize_symbol("a/b"), None);
    assert_eq!(normalize_symbol(&"X".repeat(17)), None);
}
