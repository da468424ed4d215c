pub mod holding;
pub mod quote;
pub mod transaction;
pub mod user;
