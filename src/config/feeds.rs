//! Headline feed configuration

use serde::{Deserialize, Serialize};

/// One RSS or Atom source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedSource {
    pub url: String,
}

/// A named group of sources; headlines are labelled with the region name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedRegion {
    pub name: String,
    pub sources: Vec<FeedSource>,
}

impl FeedRegion {
    pub fn new(name: impl Into<String>, urls: &[&str]) -> Self {
        Self {
            name: name.into(),
            sources: urls
                .iter()
                .map(|url| FeedSource {
                    url: url.to_string(),
                })
                .collect(),
        }
    }
}

/// Feed aggregation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedSettings {
    pub regions: Vec<FeedRegion>,
    /// Maximum headlines kept per region
    pub items_per_region: usize,
    /// Headlines with a title this short or shorter are skipped
    pub min_title_chars: usize,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            items_per_region: 2,
            min_title_chars: 20,
            timeout_seconds: 8,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

fn default_regions() -> Vec<FeedRegion> {
    vec![
        FeedRegion::new(
            "Russia",
            &["https://www.rt.com/rss/news/", "https://tass.com/rss/v2.xml"],
        ),
        FeedRegion::new(
            "Europe",
            &[
                "https://feeds.bbci.co.uk/news/world/rss.xml",
                "https://www.euronews.com/rss?level=vertical&name=news",
            ],
        ),
        FeedRegion::new(
            "The East",
            &[
                "https://www.aljazeera.com/xml/rss/all.xml",
                "https://www.tehrantimes.com/rss",
            ],
        ),
        FeedRegion::new(
            "USA",
            &[
                "https://feeds.npr.org/1001/rss.xml",
                "https://rss.nytimes.com/services/xml/rss/nyt/World.xml",
            ],
        ),
    ]
}
