pub mod auth;
pub mod dashboard_api;
pub mod fetcher;
pub mod session;
pub mod token_store;
