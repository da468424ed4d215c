//! In-memory store. One write lock guards all tables so buy and sell are atomic.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::types::holding::Holding;
use crate::types::transaction::{Transaction, TransactionKind};
use crate::types::user::{MAX_CASH, STARTING_CASH, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    usernames: HashMap<String, Uuid>,
    /// Keyed by (user, symbol); ordered so per-user listings come out by symbol.
    holdings: BTreeMap<(Uuid, String), i64>,
    /// Append-only, in insertion order.
    transactions: Vec<Transaction>,
}

impl Tables {
    fn user_mut(&mut self, user_id: Uuid) -> Result<&mut User, StoreError> {
        self.users.get_mut(&user_id).ok_or(StoreError::UserNotFound)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.usernames.contains_key(username) {
            return Err(StoreError::DuplicateUsername);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            cash: STARTING_CASH,
        };
        tables.usernames.insert(user.username.clone(), user.id);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .usernames
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn list_holdings(&self, user_id: Uuid) -> Result<Vec<Holding>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .holdings
            .iter()
            .filter(|((uid, _), _)| *uid == user_id)
            .map(|((uid, symbol), shares)| Holding {
                user_id: *uid,
                symbol: symbol.clone(),
                shares: *shares,
            })
            .collect())
    }

    async fn find_holding(
        &self,
        user_id: Uuid,
        symbol: &str,
    ) -> Result<Option<Holding>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .holdings
            .get(&(user_id, symbol.to_string()))
            .map(|shares| Holding {
                user_id,
                symbol: symbol.to_string(),
                shares: *shares,
            }))
    }

    async fn list_transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Transaction> = tables
            .transactions
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort keeps later inserts first when timestamps tie.
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(rows)
    }

    async fn execute_buy(
        &self,
        user_id: Uuid,
        symbol: &str,
        price: Decimal,
        shares: i64,
    ) -> Result<Transaction, StoreError> {
        let mut tables = self.tables.write().await;
        let txn = Transaction::new(user_id, symbol, price, shares, TransactionKind::Buy);
        let key = (user_id, symbol.to_string());

        let available = tables.user_mut(user_id)?.cash;
        let cost = match txn.checked_total() {
            Some(cost) if cost <= available => cost,
            needed => {
                return Err(StoreError::InsufficientFunds {
                    needed: needed.unwrap_or(Decimal::MAX),
                    available,
                });
            }
        };
        let new_shares = tables
            .holdings
            .get(&key)
            .copied()
            .unwrap_or(0)
            .checked_add(shares)
            .ok_or(StoreError::ShareLimitExceeded)?;

        tables.user_mut(user_id)?.cash -= cost;
        tables.holdings.insert(key, new_shares);
        tables.transactions.push(txn.clone());
        Ok(txn)
    }

    async fn execute_sell(
        &self,
        user_id: Uuid,
        symbol: &str,
        price: Decimal,
        shares: i64,
    ) -> Result<Transaction, StoreError> {
        let mut tables = self.tables.write().await;
        let key = (user_id, symbol.to_string());
        let owned = *tables.holdings.get(&key).ok_or(StoreError::NotOwned)?;
        if shares > owned {
            return Err(StoreError::InsufficientShares {
                owned,
                requested: shares,
            });
        }

        let txn = Transaction::new(user_id, symbol, price, shares, TransactionKind::Sell);
        let user = tables.user_mut(user_id)?;
        user.cash = txn
            .checked_total()
            .and_then(|proceeds| user.cash.checked_add(proceeds))
            .filter(|cash| *cash <= MAX_CASH)
            .ok_or(StoreError::CashLimitExceeded)?;

        let remaining = owned - shares;
        if remaining == 0 {
            tables.holdings.remove(&key);
        } else {
            tables.holdings.insert(key, remaining);
        }
        tables.transactions.push(txn.clone());
        Ok(txn)
    }

    async fn add_cash(&self, user_id: Uuid, amount: Decimal) -> Result<Decimal, StoreError> {
        let mut tables = self.tables.write().await;
        let user = tables.user_mut(user_id)?;
        user.cash = user
            .cash
            .checked_add(amount)
            .filter(|cash| *cash <= MAX_CASH)
            .ok_or(StoreError::CashLimitExceeded)?;
        Ok(user.cash)
    }
}
