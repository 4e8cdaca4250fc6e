//! Application state container
//!
//! Shared by every handler through axum's state extraction. Credentials are
//! read once at startup and live inside the catalog.

use crate::config::Settings;
use crate::services::{CandidateCatalog, FallbackResolver, FeedAggregator, StatsStore};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
///
/// Cheap to clone: everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,

    /// Builds ordered candidate lists from provider config and credentials
    pub catalog: Arc<CandidateCatalog>,

    /// Runs candidate lists against upstream providers
    pub resolver: Arc<FallbackResolver>,

    pub feeds: Arc<FeedAggregator>,

    pub stats: Arc<StatsStore>,

    /// Application start time (for uptime calculation)
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let credentials = settings.credentials.clone();

        tracing::info!(
            huggingface = credentials.huggingface.is_some(),
            google = credentials.google.is_some(),
            openrouter_keys = credentials.openrouter.len(),
            "Provider credentials loaded"
        );
        if credentials.is_empty() {
            tracing::warn!("No provider keys configured; text requests will fail and images use the public fallback");
        }

        let resolver = FallbackResolver::from_settings(&settings.providers)?;
        let catalog = CandidateCatalog::new(settings.providers.clone(), credentials);
        let feeds = FeedAggregator::new(settings.feeds.clone())?;
        let stats = StatsStore::new(&settings.stats_file);

        tracing::debug!(stats_file = %stats.path().display(), "Application state initialized");

        Ok(Self {
            settings: Arc::new(settings),
            catalog: Arc::new(catalog),
            resolver: Arc::new(resolver),
            feeds: Arc::new(feeds),
            stats: Arc::new(stats),
            start_time: Instant::now(),
        })
    }

    /// Get the application uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// How many keys each provider family has
    pub fn provider_status(&self) -> ProviderStatus {
        let credentials = self.catalog.credentials();
        ProviderStatus {
            huggingface: credentials.huggingface.is_some(),
            google: credentials.google.is_some(),
            openrouter_keys: credentials.openrouter.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub huggingface: bool,
    pub google: bool,
    pub openrouter_keys: usize,
}

impl ProviderStatus {
    /// At least one text provider can be tried
    pub fn has_text_provider(&self) -> bool {
        self.huggingface || self.google || self.openrouter_keys > 0
    }
}
