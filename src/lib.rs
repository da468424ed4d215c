pub mod api;
pub mod config;
pub mod error;
pub mod persistence;
pub mod portfolio;
pub mod quotes;
pub mod store;
pub mod types;
pub mod views;
