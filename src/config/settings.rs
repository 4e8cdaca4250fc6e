//! Application settings and configuration
//!
//! This module provides configuration management for the application,
//! loading settings from environment variables with sensible defaults.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;

use super::credentials::Credentials;
use super::feeds::FeedSettings;
use super::providers::{parse_list, ProviderSettings};

/// Application environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => anyhow::bail!(
                "Invalid environment: {}. Expected: development, staging, or production",
                s
            ),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,

    // Server settings
    pub host: String,
    pub port: u16,

    /// Language model answers are requested in
    pub response_language: String,

    /// JSON file backing the request counter
    pub stats_file: PathBuf,

    // Provider keys, never serialized
    #[serde(skip)]
    pub credentials: Credentials,

    pub providers: ProviderSettings,

    pub feeds: FeedSettings,
}

impl Settings {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignored in production typically)
        dotenvy::dotenv().ok();

        let defaults = ProviderSettings::default();
        let providers = ProviderSettings {
            huggingface_chat_url: env_or_default("HF_CHAT_URL", &defaults.huggingface_chat_url),
            huggingface_chat_model: env_or_default(
                "HF_CHAT_MODEL",
                &defaults.huggingface_chat_model,
            ),
            huggingface_timeout_ms: env_or_default("HF_TIMEOUT_MS", "5000")
                .parse()
                .context("Invalid HF_TIMEOUT_MS value")?,
            google_base_url: env_or_default("GOOGLE_BASE_URL", &defaults.google_base_url),
            google_model: env_or_default("GOOGLE_MODEL", &defaults.google_model),
            openrouter_url: env_or_default("OPENROUTER_URL", &defaults.openrouter_url),
            engineering_models: env_list_or("OPENROUTER_MODELS", defaults.engineering_models),
            news_models: env_list_or("OPENROUTER_NEWS_MODELS", defaults.news_models),
            huggingface_inference_url: env_or_default(
                "HF_INFERENCE_URL",
                &defaults.huggingface_inference_url,
            ),
            image_models: env_list_or("IMAGE_MODELS", defaults.image_models),
            image_fallback_url: env_or_default("IMAGE_FALLBACK_URL", &defaults.image_fallback_url),
            max_image_bytes: env_or_default("MAX_IMAGE_BYTES", &defaults.max_image_bytes.to_string())
                .parse()
                .context("Invalid MAX_IMAGE_BYTES value")?,
            request_timeout_seconds: env_or_default("PROVIDER_TIMEOUT_SECONDS", "120")
                .parse()
                .unwrap_or(120),
            site_url: env::var("SITE_URL")
                .or_else(|_| env::var("NEXT_PUBLIC_SITE_URL"))
                .unwrap_or(defaults.site_url),
            app_title: env_or_default("APP_TITLE", &defaults.app_title),
        };

        let mut feeds = FeedSettings::default();
        feeds.items_per_region = env_or_default("HEADLINES_PER_REGION", "2")
            .parse()
            .unwrap_or(2);
        feeds.timeout_seconds = env_or_default("FEED_TIMEOUT_SECONDS", "8")
            .parse()
            .unwrap_or(8);

        let settings = Self {
            // App settings
            app_name: env_or_default("APP_NAME", "reliability-assistant"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: env_or_default("ENVIRONMENT", "development")
                .parse()
                .unwrap_or_default(),
            log_level: env_or_default("LOG_LEVEL", "info"),

            // Server settings
            host: env_or_default("HOST", "0.0.0.0"),
            port: env_or_default("PORT", "3000")
                .parse()
                .context("Invalid PORT value")?,

            response_language: env_or_default("RESPONSE_LANGUAGE", "Russian"),
            stats_file: PathBuf::from(env_or_default("STATS_FILE", "stats.json")),

            credentials: Credentials::from_env(),
            providers,
            feeds,
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }

        if self.providers.huggingface_timeout_ms == 0 {
            anyhow::bail!("HF_TIMEOUT_MS must be > 0");
        }

        if self.providers.max_image_bytes == 0 {
            anyhow::bail!("MAX_IMAGE_BYTES must be > 0");
        }

        if self.feeds.items_per_region == 0 {
            anyhow::bail!("HEADLINES_PER_REGION must be > 0");
        }

        Ok(())
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "reliability-assistant".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            response_language: "Russian".to_string(),
            stats_file: PathBuf::from("stats.json"),
            credentials: Credentials::default(),
            providers: ProviderSettings::default(),
            feeds: FeedSettings::default(),
        }
    }
}

/// Helper function to get environment variable with default
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Comma separated list from the environment, falling back when unset or blank
fn env_list_or(key: &str, default: Vec<String>) -> Vec<String> {
    match env::var(key) {
        Ok(raw) => {
            let parsed = parse_list(&raw);
            if parsed.is_empty() {
                default
            } else {
                parsed
            }
        }
        Err(_) => default,
    }
}
