use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::persistence;
use crate::types::holding::Holding;
use crate::types::transaction::Transaction;
use crate::types::user::{MAX_CASH, User};

/// Postgres-backed store. Cheap to clone; shares the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        persistence::insert_user(&self.pool, Uuid::new_v4(), username, password_hash)
            .await?
            .map(User::from)
            .ok_or(StoreError::DuplicateUsername)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = persistence::get_user_by_id(&self.pool, id).await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = persistence::get_user_by_username(&self.pool, username).await?;
        Ok(row.map(User::from))
    }

    async fn list_holdings(&self, user_id: Uuid) -> Result<Vec<Holding>, StoreError> {
        let rows = persistence::list_holdings_for_user(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(Holding::from).collect())
    }

    async fn find_holding(
        &self,
        user_id: Uuid,
        symbol: &str,
    ) -> Result<Option<Holding>, StoreError> {
        let row = persistence::get_holding(&self.pool, user_id, symbol, false).await?;
        Ok(row.map(Holding::from))
    }

    async fn list_transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>, StoreError> {
        Ok(persistence::list_transactions_for_user(&self.pool, user_id).await?)
    }

    async fn execute_buy(
        &self,
        user_id: Uuid,
        symbol: &str,
        price: Decimal,
        shares: i64,
    ) -> Result<Transaction, StoreError> {
        persistence::execute_buy(&self.pool, user_id, symbol, price, shares).await
    }

    async fn execute_sell(
        &self,
        user_id: Uuid,
        symbol: &str,
        price: Decimal,
        shares: i64,
    ) -> Result<Transaction, StoreError> {
        persistence::execute_sell(&self.pool, user_id, symbol, price, shares).await
    }

    async fn add_cash(&self, user_id: Uuid, amount: Decimal) -> Result<Decimal, StoreError> {
        if let Some(cash) = persistence::credit_cash(&self.pool, user_id, amount, MAX_CASH).await? {
            return Ok(cash);
        }
        match persistence::get_user_by_id(&self.pool, user_id).await? {
            Some(_) => Err(StoreError::CashLimitExceeded),
            None => Err(StoreError::UserNotFound),
        }
    }
}
