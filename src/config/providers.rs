//! Provider endpoints and model priority lists
//!
//! Static configuration consumed by the candidate catalog. Endpoints are
//! overridable from the environment so the service can be pointed at mocks.

use serde::{Deserialize, Serialize};

pub const DEFAULT_HF_CHAT_URL: &str = "https://router.huggingface.co/v1/chat/completions";
pub const DEFAULT_HF_CHAT_MODEL: &str = "zai-org/GLM-4.5-Air:zai-org";
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GOOGLE_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_IMAGE_FALLBACK_URL: &str = "https://image.pollinations.ai";

/// Models tried on OpenRouter for the equipment workflow, cheapest and most reliable first
pub const DEFAULT_ENGINEERING_MODELS: [&str; 8] = [
    "google/gemini-2.0-flash-exp:free",
    "google/gemini-2.0-flash-lite-preview-02-05:free",
    "deepseek/deepseek-r1:free",
    "mistralai/mistral-small-24b-instruct-2501:free",
    "meta-llama/llama-3.3-70b-instruct:free",
    "tngtech/tng-r1t-chimera:free",
    "qwen/qwen-2.5-72b-instruct:free",
    "google/gemini-2.0-pro-exp-02-05:free",
];

/// Models tried on OpenRouter for news desk actions
pub const DEFAULT_NEWS_MODELS: [&str; 2] = [
    "google/gemini-2.0-flash-exp:free",
    "tngtech/tng-r1t-chimera:free",
];

/// Hugging Face inference models used for equipment illustrations
pub const DEFAULT_IMAGE_MODELS: [&str; 3] = [
    "black-forest-labs/FLUX.1-schnell",
    "stabilityai/stable-diffusion-xl-base-1.0",
    "runwayml/stable-diffusion-v1-5",
];

/// Upper bound for a generated image body (8 MiB)
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Provider endpoints, model lists and per-call limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderSettings {
    /// Hugging Face router chat-completions endpoint (text tier 1)
    pub huggingface_chat_url: String,
    pub huggingface_chat_model: String,
    /// Hard timeout for the tier-1 call, send and body read included
    pub huggingface_timeout_ms: u64,

    /// Gemini REST base URL (text tier 2)
    pub google_base_url: String,
    pub google_model: String,

    /// OpenRouter chat-completions endpoint (text tier 3)
    pub openrouter_url: String,
    pub engineering_models: Vec<String>,
    pub news_models: Vec<String>,

    /// Hugging Face inference base URL for image models
    pub huggingface_inference_url: String,
    pub image_models: Vec<String>,
    /// Keyless public image endpoint tried after every image model failed
    pub image_fallback_url: String,
    pub max_image_bytes: usize,

    /// Default timeout of the shared HTTP client
    pub request_timeout_seconds: u64,

    /// Sent to OpenRouter as `HTTP-Referer`
    pub site_url: String,
    /// Sent to OpenRouter as `X-Title`
    pub app_title: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            huggingface_chat_url: DEFAULT_HF_CHAT_URL.to_string(),
            huggingface_chat_model: DEFAULT_HF_CHAT_MODEL.to_string(),
            huggingface_timeout_ms: 5_000,
            google_base_url: DEFAULT_GOOGLE_BASE_URL.to_string(),
            google_model: DEFAULT_GOOGLE_MODEL.to_string(),
            openrouter_url: DEFAULT_OPENROUTER_URL.to_string(),
            engineering_models: to_strings(&DEFAULT_ENGINEERING_MODELS),
            news_models: to_strings(&DEFAULT_NEWS_MODELS),
            huggingface_inference_url: DEFAULT_HF_INFERENCE_URL.to_string(),
            image_models: to_strings(&DEFAULT_IMAGE_MODELS),
            image_fallback_url: DEFAULT_IMAGE_FALLBACK_URL.to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            request_timeout_seconds: 120,
            site_url: "http://localhost:3000".to_string(),
            app_title: "TOiR AI Assistant".to_string(),
        }
    }
}

impl ProviderSettings {
    /// Point every provider at one base URL (used with mock servers)
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.huggingface_chat_url = format!("{}/hf/v1/chat/completions", base);
        self.google_base_url = format!("{}/google/v1beta", base);
        self.openrouter_url = format!("{}/openrouter/api/v1/chat/completions", base);
        self.huggingface_inference_url = format!("{}/hf-inference/models", base);
        self.image_fallback_url = format!("{}/pollinations", base);
        self
    }
}

/// Parse a comma separated list, dropping blanks
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
