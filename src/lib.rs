//! Headless client for the stock spread dashboard backend.
//!
//! Polls `/api/get-data` on a fixed interval, normalizes quotes and the intraday / five-day spread
//! series, and pushes the results to a [`services::sink::DashboardSink`].

pub mod app;
pub mod commands;
pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
