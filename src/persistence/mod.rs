//! Database layer: pool, migrations, and access for users, holdings, transactions.

mod holdings;
mod pool;
mod transactions;
mod users;

pub use holdings::{get_holding, list_holdings_for_user, HoldingRow};
pub use pool::{create_pool_and_migrate, run_migrations};
pub use sqlx::PgPool;
pub use transactions::{execute_buy, execute_sell, list_transactions_for_user, TransactionRow};
pub use users::{credit_cash, get_user_by_id, get_user_by_username, insert_user, UserRow};
