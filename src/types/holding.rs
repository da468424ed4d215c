use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shares a user currently owns in one symbol. Rows with zero shares are removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub user_id: Uuid,
    pub symbol: String,
    pub shares: i64,
}
