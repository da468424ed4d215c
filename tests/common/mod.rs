//! Shared harness: spawn the app on a random port with in-memory backends.
#![allow(dead_code)]

use std::sync::Arc;

use paper_broker::api::routes::{AppState, app_router};
use paper_broker::quotes::StaticQuoteProvider;
use paper_broker::store::{MemoryStore, Store};
use paper_broker::types::user::User;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Response;
use rust_decimal_macros::dec;

pub const JWT_SECRET: &[u8] = b"test-jwt-secret";

pub struct TestApp {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub quotes: Arc<StaticQuoteProvider>,
    pub client: reqwest::Client,
    _handle: tokio::task::JoinHandle<()>,
}

pub fn test_quotes() -> StaticQuoteProvider {
    StaticQuoteProvider::new()
        .with_quote("AAPL", "Apple Inc.", dec!(100))
        .with_quote("MSFT", "Microsoft Corporation", dec!(250))
        .with_quote("NFLX", "Netflix, Inc.", dec!(120.50))
}

/// Spawn app on a random port and return a handle that keeps the server running.
pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let quotes = Arc::new(test_quotes());
    let state = AppState {
        store: store.clone(),
        quotes: quotes.clone(),
        jwt_secret: JWT_SECRET.to_vec(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);
    let app = app_router(state);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        base_url,
        store,
        quotes,
        client,
        _handle: handle,
    }
}

/// The `session=<jwt>` pair from a response's `Set-Cookie`, if one was issued.
pub fn session_cookie(res: &Response) -> Option<String> {
    res.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with("session=") && pair.len() > "session=".len())
        .map(str::to_string)
}

pub fn location(res: &Response) -> Option<&str> {
    res.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut req = self.client.get(self.url(path));
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }
        req.send().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, cookie: Option<&str>, form: &[(&str, &str)]) -> Response {
        let mut req = self.client.post(self.url(path)).form(form);
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }
        req.send().await.unwrap()
    }

    pub async fn register(&self, username: &str, password: &str, confirmation: &str) -> Response {
        self.post_form(
            "/register",
            None,
            &[
                ("username", username),
                ("password", password),
                ("confirmation", confirmation),
            ],
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.post_form("/login", None, &[("username", username), ("password", password)])
            .await
    }

    /// Register and log in; returns the cookie to send on later requests.
    pub async fn sign_up(&self, username: &str) -> String {
        let reg = self.register(username, "hunter2", "hunter2").await;
        assert_eq!(reg.status().as_u16(), 303);
        let login = self.login(username, "hunter2").await;
        assert_eq!(login.status().as_u16(), 303);
        session_cookie(&login).expect("login issues a session cookie")
    }

    pub async fn user(&self, username: &str) -> User {
        self.store
            .find_user_by_username(username)
            .await
            .unwrap()
            .expect("user exists")
    }

    pub async fn shares(&self, username: &str, symbol: &str) -> Option<i64> {
        let user = self.user(username).await;
        self.store
            .find_holding(user.id, symbol)
            .await
            .unwrap()
            .map(|h| h.shares)
    }

    pub async fn buy(&self, cookie: &str, symbol: &str, shares: &str) -> Response {
        self.post_form("/buy", Some(cookie), &[("symbol", symbol), ("shares", shares)])
            .await
    }

    pub async fn sell(&self, cookie: &str, symbol: &str, shares: &str) -> Response {
        self.post_form("/sell", Some(cookie), &[("symbol", symbol), ("shares", shares)])
            .await
    }
}
