//! Quote, buy and sell.

use axum::Form;
use axum::extract::State;
use axum::response::{Html, Redirect};
use log::info;

use crate::api::auth::AuthUser;
use crate::api::forms::{QuoteForm, TradeForm, parse_shares};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::store::StoreError;
use crate::types::quote::Quote;
use crate::views;

const INVALID_SYMBOL: &str = "That's not a valid stock symbol!";
const INVALID_SHARES: &str = "Provide a valid number of shares";

async fn lookup_or_apologize(state: &AppState, symbol: &str) -> Result<Quote, AppError> {
    state
        .quotes
        .lookup(symbol)
        .await?
        .ok_or_else(|| AppError::apology(INVALID_SYMBOL))
}

/// GET /quote
pub async fn quote_form(_user: AuthUser) -> Html<String> {
    Html(views::quote_page())
}

/// POST /quote
pub async fn quote(
    _user: AuthUser,
    State(state): State<AppState>,
    Form(form): Form<QuoteForm>,
) -> Result<Html<String>, AppError> {
    let quote = lookup_or_apologize(&state, &form.symbol).await?;
    Ok(Html(views::quoted_page(&quote)))
}

/// GET /buy
pub async fn buy_form(_user: AuthUser) -> Html<String> {
    Html(views::buy_page())
}

/// POST /buy. The looked-up price is authoritative; the store re-checks cash atomically.
pub async fn buy(
    user: AuthUser,
    State(state): State<AppState>,
    Form(form): Form<TradeForm>,
) -> Result<Redirect, AppError> {
    let quote = lookup_or_apologize(&state, &form.symbol).await?;
    let shares = parse_shares(&form.shares).ok_or_else(|| AppError::apology(INVALID_SHARES))?;

    let txn = match state
        .store
        .execute_buy(user.user_id, &quote.symbol, quote.price, shares)
        .await
    {
        Ok(txn) => txn,
        Err(StoreError::InsufficientFunds { .. }) => {
            return Err(AppError::apology("Not enough cash to buy."));
        }
        Err(StoreError::ShareLimitExceeded) => return Err(AppError::apology(INVALID_SHARES)),
        Err(StoreError::UserNotFound) => return Err(AppError::SessionExpired),
        Err(e) => return Err(e.into()),
    };
    info!(
        "user {} bought {} {} at {}",
        user.user_id, txn.shares, txn.symbol, txn.price
    );
    Ok(Redirect::to("/"))
}

/// GET /sell
pub async fn sell_form(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let symbols: Vec<String> = state
        .store
        .list_holdings(user.user_id)
        .await?
        .into_iter()
        .map(|h| h.symbol)
        .collect();
    Ok(Html(views::sell_page(&symbols)))
}

/// POST /sell
pub async fn sell(
    user: AuthUser,
    State(state): State<AppState>,
    Form(form): Form<TradeForm>,
) -> Result<Redirect, AppError> {
    if form.symbol.trim().is_empty() {
        return Err(AppError::apology("Provide a valid stock symbol"));
    }
    let quote = lookup_or_apologize(&state, &form.symbol).await?;

    let not_owned = || AppError::apology("You do not own shares of the selected stock");
    let too_many = || AppError::apology("You do not own that many shares");

    let holding = state
        .store
        .find_holding(user.user_id, &quote.symbol)
        .await?
        .ok_or_else(not_owned)?;
    let shares = parse_shares(&form.shares).ok_or_else(|| AppError::apology(INVALID_SHARES))?;
    if shares > holding.shares {
        return Err(too_many());
    }

    let txn = match state
        .store
        .execute_sell(user.user_id, &quote.symbol, quote.price, shares)
        .await
    {
        Ok(txn) => txn,
        Err(StoreError::NotOwned) => return Err(not_owned()),
        Err(StoreError::InsufficientShares { .. }) => return Err(too_many()),
        Err(StoreError::CashLimitExceeded) => {
            return Err(AppError::apology("Sale would exceed the account balance limit"));
        }
        Err(StoreError::UserNotFound) => return Err(AppError::SessionExpired),
        Err(e) => return Err(e.into()),
    };
    info!(
        "user {} sold {} {} at {}",
        user.user_id, txn.shares, txn.symbol, txn.price
    );
    Ok(Redirect::to("/"))
}
