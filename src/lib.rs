//! Reliability assistant backend
//!
//! HTTP service for an industrial reliability-engineering assistant. Text and
//! image requests are answered by the first provider candidate that succeeds.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod schemas;
pub mod server;
pub mod services;
pub mod utils;

pub use config::Settings;
pub use error::ApiError;
pub use server::App;
