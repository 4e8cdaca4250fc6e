//! Usage statistics store
//!
//! A small JSON document on disk. Reads of a missing or corrupt file give
//! zeroed counters; every update rewrites the whole file under a lock.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

/// Newest history entries kept
pub const HISTORY_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("failed to write stats file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode stats: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_requests: u64,
    pub telegram_posts: u64,
    pub analytics: u64,
    pub headlines: u64,
    pub history: Vec<Value>,
}

impl Stats {
    /// Count one event of `kind` and push `entry` onto the history
    pub fn record(&mut self, kind: &str, entry: Option<Value>) {
        self.total_requests += 1;
        match kind {
            "telegram" => self.telegram_posts += 1,
            "analytics" => self.analytics += 1,
            "headlines" => self.headlines += 1,
            _ => {}
        }

        if let Some(entry) = entry {
            self.history.insert(0, entry);
            self.history.truncate(HISTORY_LIMIT);
        }
    }
}

pub struct StatsStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Stats {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Record an event and persist; returns the updated stats
    pub async fn record(&self, kind: &str, entry: Option<Value>) -> Result<Stats, StatsError> {
        let _guard = self.lock.lock().await;

        let mut stats = self.read().await;
        stats.record(kind, entry);

        let encoded = serde_json::to_vec_pretty(&stats)?;
        tokio::fs::write(&self.path, encoded).await?;

        tracing::debug!(kind = %kind, total = stats.total_requests, "Stats updated");
        Ok(stats)
    }

    async fn read(&self) -> Stats {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Stats::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Unreadable stats file, starting from zero");
                return Stats::default();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Invalid stats file, starting from zero");
            Stats::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_as_zero() {
        let dir = TempDir::new().unwrap();
        let store = StatsStore::new(dir.path().join("stats.json"));
        assert_eq!(store.load().await, Stats::default());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(StatsStore::new(&path).load().await, Stats::default());
    }

    #[tokio::test]
    async fn test_record_counts_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.json");
        let store = StatsStore::new(&path);

        store.record("telegram", None).await.unwrap();
        store.record("analytics", Some(json!({"title": "a"}))).await.unwrap();
        let stats = store.record("other", None).await.unwrap();

        assert_eq!(stats.total_requests, 3);
        assert_eq!(stats.telegram_posts, 1);
        assert_eq!(stats.analytics, 1);
        assert_eq!(stats.headlines, 0);

        let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["total_requests"], json!(3));
        assert_eq!(on_disk["history"][0]["title"], json!("a"));
    }

    #[test]
    fn test_history_keeps_newest() {
        let mut stats = Stats::default();
        for i in 0..7 {
            stats.record("headlines", Some(json!(i)));
        }
        assert_eq!(stats.headlines, 7);
        assert_eq!(stats.history, vec![json!(6), json!(5), json!(4), json!(3), json!(2)]);
    }
}
