//! Holding persistence: per-user share counts.

use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::types::holding::Holding;

#[derive(Debug, FromRow)]
pub struct HoldingRow {
    pub user_id: Uuid,
    pub symbol: String,
    pub shares: i64,
}

impl From<HoldingRow> for Holding {
    fn from(row: HoldingRow) -> Self {
        Holding {
            user_id: row.user_id,
            symbol: row.symbol,
            shares: row.shares,
        }
    }
}

/// List a user's holdings ordered by symbol (for GET / and GET /sell).
pub async fn list_holdings_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<HoldingRow>, sqlx::Error> {
    let rows = sqlx::query_as::<_, HoldingRow>(
        "SELECT user_id, symbol, shares FROM holdings WHERE user_id = $1 ORDER BY symbol",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Get one holding. Generic over executor so it can run inside a transaction with `FOR UPDATE`.
pub async fn get_holding<'e, E>(
    executor: E,
    user_id: Uuid,
    symbol: &str,
    for_update: bool,
) -> Result<Option<HoldingRow>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let sql = if for_update {
        "SELECT user_id, symbol, shares FROM holdings WHERE user_id = $1 AND symbol = $2 FOR UPDATE"
    } else {
        "SELECT user_id, symbol, shares FROM holdings WHERE user_id = $1 AND symbol = $2"
    };
    let row = sqlx::query_as::<_, HoldingRow>(sql)
        .bind(user_id)
        .bind(symbol)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}
