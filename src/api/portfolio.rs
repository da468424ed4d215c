//! Index, history and add-cash.

use axum::Form;
use axum::extract::State;
use axum::response::{Html, Redirect};
use log::info;

use crate::api::auth::AuthUser;
use crate::api::forms::{CashForm, parse_cash};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::portfolio::load_portfolio;
use crate::store::StoreError;
use crate::views;

/// GET /
pub async fn index(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let portfolio = load_portfolio(state.store.as_ref(), state.quotes.as_ref(), user.user_id).await?;
    Ok(Html(views::index_page(&portfolio)))
}

/// GET /history
pub async fn history(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let transactions = state.store.list_transactions(user.user_id).await?;
    Ok(Html(views::history_page(&transactions)))
}

/// GET /add_cash
pub async fn add_cash_form(_user: AuthUser) -> Html<String> {
    Html(views::add_cash_page())
}

/// POST /add_cash
pub async fn add_cash(
    user: AuthUser,
    State(state): State<AppState>,
    Form(form): Form<CashForm>,
) -> Result<Redirect, AppError> {
    let invalid = || AppError::apology("Not a valid amount of cash");
    let amount = parse_cash(&form.cash).ok_or_else(invalid)?;
    let cash = match state.store.add_cash(user.user_id, amount).await {
        Ok(cash) => cash,
        Err(StoreError::CashLimitExceeded) => return Err(invalid()),
        Err(StoreError::UserNotFound) => return Err(AppError::SessionExpired),
        Err(e) => return Err(e.into()),
    };
    info!("user {} added {}, balance {}", user.user_id, amount, cash);
    Ok(Redirect::to("/"))
}
