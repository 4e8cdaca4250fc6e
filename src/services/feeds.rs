//! Headline aggregation
//!
//! Regions are fetched concurrently and joined; inside a region, sources are
//! read in order until the region's cap is reached. A source that fails is
//! logged and skipped, so the aggregate never fails as a whole.

use futures::future::join_all;
use regex::{Captures, Regex};
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::config::{FeedRegion, FeedSettings};
use crate::schemas::api::Headline;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed returned HTTP {0}")]
    Status(u16),
}

/// A raw item parsed out of a feed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
}

pub struct FeedAggregator {
    client: Client,
    settings: FeedSettings,
}

impl FeedAggregator {
    pub fn new(settings: FeedSettings) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self { client, settings })
    }

    /// Headlines of every region, or of the one named by `category`
    pub async fn headlines(&self, category: Option<&str>) -> Vec<Headline> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());

        let regions: Vec<&FeedRegion> = self
            .settings
            .regions
            .iter()
            .filter(|region| category.map_or(true, |c| region.name.eq_ignore_ascii_case(c)))
            .collect();

        if regions.is_empty() {
            tracing::debug!(category = ?category, "No feed region matches category");
            return Vec::new();
        }

        let per_region = join_all(regions.into_iter().map(|region| self.region_headlines(region))).await;

        per_region.into_iter().flatten().collect()
    }

    async fn region_headlines(&self, region: &FeedRegion) -> Vec<Headline> {
        let mut headlines: Vec<Headline> = Vec::new();

        for source in &region.sources {
            if headlines.len() >= self.settings.items_per_region {
                break;
            }

            let document = match self.fetch(&source.url).await {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!(region = %region.name, url = %source.url, error = %e, "Feed fetch failed");
                    continue;
                }
            };

            for item in parse_feed_items(&document) {
                if headlines.len() >= self.settings.items_per_region {
                    break;
                }
                if item.link.is_empty() || item.title.chars().count() <= self.settings.min_title_chars {
                    continue;
                }
                if headlines.iter().any(|h| h.title == item.title) {
                    continue;
                }
                headlines.push(Headline {
                    title: item.title,
                    link: item.link,
                    source: region.name.clone(),
                });
            }
        }

        tracing::debug!(region = %region.name, count = headlines.len(), "Region headlines collected");
        headlines
    }

    async fn fetch(&self, url: &str) -> Result<String, FeedError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static feed regex is valid"))
}

fn item_re() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"(?is)<item\b[^>]*>(.*?)</item>")
}

fn entry_re() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"(?is)<entry\b[^>]*>(.*?)</entry>")
}

fn title_re() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"(?is)<title\b[^>]*>(.*?)</title>")
}

fn link_text_re() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"(?is)<link\b[^>/]*>(.*?)</link>")
}

fn link_href_re() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r#"(?is)<link\b[^>]*?\bhref\s*=\s*["']([^"']+)["']"#)
}

fn numeric_entity_re() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"&#([xX])?([0-9a-fA-F]+);")
}

/// Strip CDATA markers, decode character references and trim
fn clean_text(raw: &str) -> String {
    let text = raw.replace("<![CDATA[", "").replace("]]>", "");

    let text = numeric_entity_re().replace_all(&text, |caps: &Captures| {
        let radix = if caps.get(1).is_some() { 16 } else { 10 };
        u32::from_str_radix(&caps[2], radix)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    // &amp; last, so "&amp;lt;" stays literal
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Extract items from an RSS document, or entries from an Atom one
pub fn parse_feed_items(document: &str) -> Vec<FeedItem> {
    let mut blocks: Vec<&str> = item_re()
        .captures_iter(document)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    if blocks.is_empty() {
        blocks = entry_re()
            .captures_iter(document)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
    }

    blocks
        .into_iter()
        .map(|block| {
            let title = title_re()
                .captures(block)
                .and_then(|c| c.get(1))
                .map(|m| clean_text(m.as_str()))
                .unwrap_or_default();

            let link = link_text_re()
                .captures(block)
                .and_then(|c| c.get(1))
                .map(|m| clean_text(m.as_str()))
                .filter(|l| !l.is_empty())
                .or_else(|| {
                    link_href_re()
                        .captures(block)
                        .and_then(|c| c.get(1))
                        .map(|m| clean_text(m.as_str()))
                })
                .unwrap_or_default();

            FeedItem { title, link }
        })
        .collect()
}
