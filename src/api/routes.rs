use std::sync::Arc;

use axum::http::HeaderValue;
use axum::http::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use axum::middleware;
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use crate::api::{account, portfolio, trading};
use crate::quotes::QuoteProvider;
use crate::store::Store;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub quotes: Arc<dyn QuoteProvider>,
    pub jwt_secret: Vec<u8>,
}

async fn health() -> &'static str {
    "healthy"
}

/// Every response, including redirects and apologies, must not be cached.
async fn no_cache(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    response
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(portfolio::index))
        .route("/health", get(health))
        .route("/register", get(account::register_form).post(account::register))
        .route("/login", get(account::login_form).post(account::login))
        .route("/logout", get(account::logout))
        .route("/quote", get(trading::quote_form).post(trading::quote))
        .route("/buy", get(trading::buy_form).post(trading::buy))
        .route("/sell", get(trading::sell_form).post(trading::sell))
        .route("/add_cash", get(portfolio::add_cash_form).post(portfolio::add_cash))
        .route("/history", get(portfolio::history))
        .layer(middleware::map_response(no_cache))
        .with_state(state)
}
