//! User persistence: lookup, insert, cash credit.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::types::user::User;

/// Row returned from DB (username is stored lowercase).
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub cash: Decimal,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            cash: row.cash,
        }
    }
}

/// Get a user by username (lowercase). For login and duplicate checks.
pub async fn get_user_by_username(
    pool: &PgPool,
    username_lowercase: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password_hash, cash FROM users WHERE username = $1",
    )
    .bind(username_lowercase)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Get a user by id (session owner).
pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password_hash, cash FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert a user with the default starting cash. Username must already be lowercase.
/// Returns `None` when the username is taken.
pub async fn insert_user(
    pool: &PgPool,
    id: Uuid,
    username: &str,
    password_hash: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3) \
         ON CONFLICT (username) DO NOTHING \
         RETURNING id, username, password_hash, cash",
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Add `amount` to a user's cash unless the result would exceed `max_cash`.
/// Returns the new balance, or `None` for an unknown user or a refused credit.
pub async fn credit_cash(
    pool: &PgPool,
    id: Uuid,
    amount: Decimal,
    max_cash: Decimal,
) -> Result<Option<Decimal>, sqlx::Error> {
    let cash = sqlx::query_scalar::<_, Decimal>(
        "UPDATE users SET cash = cash + $1 WHERE id = $2 AND cash + $1 <= $3 RETURNING cash",
    )
    .bind(amount)
    .bind(id)
    .bind(max_cash)
    .fetch_optional(pool)
    .await?;
    Ok(cash)
}
