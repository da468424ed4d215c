pub mod account;
pub mod auth;
pub mod forms;
pub mod portfolio;
pub mod routes;
pub mod trading;
