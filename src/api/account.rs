//! Register, login, logout.

use axum::Form;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use uuid::Uuid;
use log::{info, warn};

use crate::api::auth::{clear_session_cookie, create_token, hash_password, session_cookie, verify_password};
use crate::api::forms::{LoginForm, RegisterForm, normalize_username};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::store::StoreError;
use crate::views;

/// GET /register
pub async fn register_form() -> Html<String> {
    Html(views::register_page())
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    let username = normalize_username(&form.username);
    if username.is_empty() {
        return Err(AppError::apology("Must provide username"));
    }
    if state.store.find_user_by_username(&username).await?.is_some() {
        return Err(AppError::apology("Username already exists"));
    }
    if form.password.is_empty() || form.password != form.confirmation {
        return Err(AppError::apology("Provide a valid password"));
    }

    let password_hash = hash_password(&form.password).map_err(AppError::PasswordHash)?;
    let user = match state.store.create_user(&username, &password_hash).await {
        Ok(user) => user,
        Err(StoreError::DuplicateUsername) => {
            return Err(AppError::apology("Username already exists"));
        }
        Err(e) => return Err(e.into()),
    };
    info!("registered user {} ({})", user.username, user.id);
    Ok(Redirect::to("/login"))
}

/// GET /login. Showing the form forgets any current session.
pub async fn login_form() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Html(views::login_page()),
    )
}

/// POST /login. Any existing session is forgotten first, so a failed attempt
/// also logs the browser out.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let forget = AppendHeaders([(SET_COOKIE, clear_session_cookie())]);
    match authenticate(&state, &form).await {
        Ok(user_id) => match create_token(&state.jwt_secret, user_id) {
            Ok(token) => {
                info!("user {} logged in", user_id);
                (
                    AppendHeaders([(SET_COOKIE, session_cookie(&token))]),
                    Redirect::to("/"),
                )
                    .into_response()
            }
            Err(e) => (forget, AppError::from(e)).into_response(),
        },
        Err(e) => (forget, e).into_response(),
    }
}

async fn authenticate(state: &AppState, form: &LoginForm) -> Result<Uuid, AppError> {
    let username = normalize_username(&form.username);
    if username.is_empty() {
        return Err(AppError::apology("must provide username"));
    }
    if form.password.is_empty() {
        return Err(AppError::apology("must provide password"));
    }

    let user = match state.store.find_user_by_username(&username).await? {
        Some(user) if verify_password(&form.password, &user.password_hash) => user,
        _ => {
            warn!("failed login for {}", username);
            return Err(AppError::apology("invalid username and/or password"));
        }
    };

    Ok(user.id)
}

/// GET /logout
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Redirect::to("/"),
    )
}
