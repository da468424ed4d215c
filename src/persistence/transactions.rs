//! Transaction ledger persistence: history listing plus the buy and sell write paths.
//!
//! Buy and sell each run inside one database transaction. The user and holding
//! rows are locked with `FOR UPDATE` before the balance checks so two concurrent
//! requests for the same account cannot both pass validation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::holdings::get_holding;
use crate::store::StoreError;
use crate::types::transaction::{Transaction, TransactionKind};
use crate::types::user::MAX_CASH;

#[derive(Debug, FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub symbol: String,
    pub price: Decimal,
    pub shares: i64,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

/// Convert a row for display. Skips rows with an unknown kind.
fn transaction_row_to_transaction(row: TransactionRow) -> Option<Transaction> {
    let kind = TransactionKind::parse(&row.kind)?;
    Some(Transaction {
        id: row.id,
        user_id: row.user_id,
        symbol: row.symbol,
        price: row.price,
        shares: row.shares,
        kind,
        timestamp: row.created_at,
    })
}

/// List every transaction for a user, most recent first (for GET /history).
pub async fn list_transactions_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Transaction>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TransactionRow>(
        "SELECT id, user_id, symbol, price, shares, kind, created_at \
         FROM transactions WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .filter_map(transaction_row_to_transaction)
        .collect())
}

async fn insert_transaction(
    conn: &mut sqlx::PgConnection,
    txn: &Transaction,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO transactions (id, user_id, symbol, price, shares, kind, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(txn.id)
    .bind(txn.user_id)
    .bind(&txn.symbol)
    .bind(txn.price)
    .bind(txn.shares)
    .bind(txn.kind.as_str())
    .bind(txn.timestamp)
    .execute(conn)
    .await?;
    Ok(())
}

/// Record a buy: append the ledger row, debit cash, upsert the holding.
pub async fn execute_buy(
    pool: &PgPool,
    user_id: Uuid,
    symbol: &str,
    price: Decimal,
    shares: i64,
) -> Result<Transaction, StoreError> {
    let mut tx = pool.begin().await?;

    let cash = sqlx::query_scalar::<_, Decimal>("SELECT cash FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::UserNotFound)?;

    let txn = Transaction::new(user_id, symbol, price, shares, TransactionKind::Buy);
    let cost = match txn.checked_total() {
        Some(cost) if cost <= cash => cost,
        needed => {
            return Err(StoreError::InsufficientFunds {
                needed: needed.unwrap_or(Decimal::MAX),
                available: cash,
            });
        }
    };

    let held = get_holding(&mut *tx, user_id, symbol, true)
        .await?
        .map_or(0, |row| row.shares);
    if held.checked_add(shares).is_none() {
        return Err(StoreError::ShareLimitExceeded);
    }

    insert_transaction(&mut tx, &txn).await?;

    sqlx::query("UPDATE users SET cash = cash - $1 WHERE id = $2")
        .bind(cost)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO holdings (user_id, symbol, shares) VALUES ($1, $2, $3) \
         ON CONFLICT (user_id, symbol) DO UPDATE SET shares = holdings.shares + EXCLUDED.shares",
    )
    .bind(user_id)
    .bind(symbol)
    .bind(shares)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(txn)
}

/// Record a sell: append the ledger row, credit cash, decrement the holding and
/// drop it once empty.
pub async fn execute_sell(
    pool: &PgPool,
    user_id: Uuid,
    symbol: &str,
    price: Decimal,
    shares: i64,
) -> Result<Transaction, StoreError> {
    let mut tx = pool.begin().await?;

    let holding = get_holding(&mut *tx, user_id, symbol, true)
        .await?
        .ok_or(StoreError::NotOwned)?;
    if shares > holding.shares {
        return Err(StoreError::InsufficientShares {
            owned: holding.shares,
            requested: shares,
        });
    }

    let cash = sqlx::query_scalar::<_, Decimal>("SELECT cash FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::UserNotFound)?;

    let txn = Transaction::new(user_id, symbol, price, shares, TransactionKind::Sell);
    let new_cash = txn
        .checked_total()
        .and_then(|proceeds| cash.checked_add(proceeds))
        .filter(|cash| *cash <= MAX_CASH)
        .ok_or(StoreError::CashLimitExceeded)?;
    insert_transaction(&mut tx, &txn).await?;

    sqlx::query("UPDATE users SET cash = $1 WHERE id = $2")
        .bind(new_cash)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if holding.shares == shares {
        sqlx::query("DELETE FROM holdings WHERE user_id = $1 AND symbol = $2")
            .bind(user_id)
            .bind(symbol)
            .execute(&mut *tx)
            .await?;
    } else {
        sqlx::query("UPDATE holdings SET shares = shares - $1 WHERE user_id = $2 AND symbol = $3")
            .bind(shares)
            .bind(user_id)
            .bind(symbol)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(txn)
}
