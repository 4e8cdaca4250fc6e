//! Provider credentials
//!
//! The credential set is loaded once from the environment and handed to the
//! candidate catalog explicitly, so a missing key is just an empty slot that
//! tests can construct directly.

use std::env;
use std::fmt;

use crate::utils::mask_secret;

/// Environment variable holding the Hugging Face router key
pub const HF_API_KEY_VAR: &str = "HF_API_KEY";

/// Environment variable holding the Google Gemini key
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Environment variables holding interchangeable OpenRouter keys, in priority order
pub const OPENROUTER_API_KEY_VARS: [&str; 3] = [
    "OPENROUTER_API_KEY",
    "OPENROUTER_API_KEY2",
    "OPENROUTER_API_KEY3",
];

/// A provider API key
///
/// `Debug` and `Display` only ever print the masked form. Use [`ApiKey::expose`]
/// when the raw value must go on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key, returning `None` for empty or whitespace-only values
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw key value
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Masked form safe for logs
    pub fn masked(&self) -> String {
        mask_secret(&self.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.masked())
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Keys grouped by provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Dedicated Hugging Face key (text tier 1, image models)
    pub huggingface: Option<ApiKey>,

    /// Dedicated Google key (text tier 2)
    pub google: Option<ApiKey>,

    /// Interchangeable OpenRouter keys (text tier 3), in priority order
    pub openrouter: Vec<ApiKey>,
}

impl Credentials {
    /// Load credentials from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load credentials through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            huggingface: lookup(HF_API_KEY_VAR).and_then(ApiKey::new),
            google: lookup(GOOGLE_API_KEY_VAR).and_then(ApiKey::new),
            openrouter: OPENROUTER_API_KEY_VARS
                .iter()
                .filter_map(|name| lookup(*name).and_then(ApiKey::new))
                .collect(),
        }
    }

    /// True when no provider has a key
    pub fn is_empty(&self) -> bool {
        self.huggingface.is_none() && self.google.is_none() && self.openrouter.is_empty()
    }

    /// Builder-style setters, mostly for tests and embedding
    pub fn with_huggingface(mut self, key: &str) -> Self {
        self.huggingface = ApiKey::new(key);
        self
    }

    pub fn with_google(mut self, key: &str) -> Self {
        self.google = ApiKey::new(key);
        self
    }

    pub fn with_openrouter_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.openrouter = keys.into_iter().filter_map(ApiKey::new).collect();
        self
    }
}
