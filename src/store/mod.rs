//! Storage seam: every handler talks to an `Arc<dyn Store>`.
//!
//! `PgStore` is the production backend. `MemoryStore` backs local runs without
//! `DATABASE_URL` and the integration tests.

mod memory;
mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::types::holding::Holding;
use crate::types::transaction::Transaction;
use crate::types::user::User;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already taken")]
    DuplicateUsername,

    #[error("user not found")]
    UserNotFound,

    #[error("insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    #[error("no holding for symbol")]
    NotOwned,

    #[error("insufficient shares: owned {owned}, requested {requested}")]
    InsufficientShares { owned: i64, requested: i64 },

    #[error("account balance limit exceeded")]
    CashLimitExceeded,

    #[error("holding share limit exceeded")]
    ShareLimitExceeded,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Create a user with the starting cash balance. Username must already be lowercase.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Holdings for a user ordered by symbol.
    async fn list_holdings(&self, user_id: Uuid) -> Result<Vec<Holding>, StoreError>;

    async fn find_holding(
        &self,
        user_id: Uuid,
        symbol: &str,
    ) -> Result<Option<Holding>, StoreError>;

    /// Transactions for a user, most recent first.
    async fn list_transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>, StoreError>;

    /// Atomically check cash, append a buy, debit cash and upsert the holding.
    /// Fails with `InsufficientFunds` and leaves everything untouched when
    /// `price * shares` exceeds the balance.
    async fn execute_buy(
        &self,
        user_id: Uuid,
        symbol: &str,
        price: Decimal,
        shares: i64,
    ) -> Result<Transaction, StoreError>;

    /// Atomically check the holding, append a sell, credit cash and decrement
    /// the holding, deleting it at zero.
    async fn execute_sell(
        &self,
        user_id: Uuid,
        symbol: &str,
        price: Decimal,
        shares: i64,
    ) -> Result<Transaction, StoreError>;

    /// Credit cash and return the new balance. Fails with `CashLimitExceeded`
    /// rather than pushing the balance past `MAX_CASH`.
    async fn add_cash(&self, user_id: Uuid, amount: Decimal) -> Result<Decimal, StoreError>;
}
