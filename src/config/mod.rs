//! Configuration management module
//!
//! This module handles loading and validating application configuration
//! from environment variables and .env files.

pub mod credentials;
pub mod feeds;
pub mod providers;
pub mod settings;

pub use credentials::{ApiKey, Credentials};
pub use feeds::{FeedRegion, FeedSettings, FeedSource};
pub use providers::ProviderSettings;
pub use settings::{Environment, Settings};
