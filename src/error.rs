//! Request-level error type. Validation failures render an apology page with 400;
//! everything else is logged and rendered as a server-side apology.

use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use log::error;
use thiserror::Error;

use crate::api::auth::clear_session_cookie;
use crate::quotes::QuoteError;
use crate::store::StoreError;
use crate::views;

#[derive(Debug, Error)]
pub enum AppError {
    /// User-facing validation failure.
    #[error("{0}")]
    Apology(String),

    /// The session points at a user the store does not know.
    #[error("session no longer valid")]
    SessionExpired,

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("password hashing failed: {0}")]
    PasswordHash(argon2::password_hash::Error),

    #[error("session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn apology(message: impl Into<String>) -> Self {
        AppError::Apology(message.into())
    }
}

fn render(message: &str, status: StatusCode) -> Response {
    (status, Html(views::apology_page(message, status))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Apology(message) => render(&message, StatusCode::BAD_REQUEST),
            AppError::SessionExpired => (
                AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
                Redirect::to("/login"),
            )
                .into_response(),
            AppError::Quote(err) => {
                error!("quote lookup failed: {}", err);
                render("quote service unavailable", StatusCode::BAD_GATEWAY)
            }
            err => {
                error!("request failed: {}", err);
                render("internal server error", StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
