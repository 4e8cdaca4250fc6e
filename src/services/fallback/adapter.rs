//! Provider adapters
//!
//! One adapter per request dialect. An adapter shapes the outbound request
//! for a candidate and extracts the payload from a successful (2xx) response
//! according to the candidate's [`ExtractionRule`]. Status handling, timeouts
//! and iteration belong to the resolver.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::json;

use super::candidate::{Candidate, ExtractionRule, Wire};
use super::outcome::{AttemptError, Payload};
use crate::schemas::gemini::{GeminiRequest, GeminiResponse};
use crate::schemas::openai::{ChatCompletionRequest, ChatCompletionResponse};

/// Default content type assumed for image bodies without one
pub const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Per-attempt resource limits
#[derive(Debug, Clone, Copy)]
pub struct AttemptLimits {
    /// Maximum accepted size of a binary body
    pub max_payload_bytes: usize,
}

/// What a candidate produced
#[derive(Debug, Clone)]
pub struct Extracted {
    pub payload: Payload,
    /// Model identifier reported by the provider, if any
    pub echoed_model: Option<String>,
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Build the outbound request for `candidate`
    fn request(
        &self,
        client: &Client,
        candidate: &Candidate,
        prompt: &str,
    ) -> Result<RequestBuilder, AttemptError>;

    /// Pull the payload out of a 2xx response
    async fn extract(
        &self,
        response: Response,
        candidate: &Candidate,
        limits: &AttemptLimits,
    ) -> Result<Extracted, AttemptError>;
}

/// Adapter for a request dialect
pub fn adapter_for(wire: Wire) -> &'static dyn ProviderAdapter {
    match wire {
        Wire::OpenAiChat => &OpenAiChatAdapter,
        Wire::GeminiGenerate => &GeminiAdapter,
        Wire::InferenceImage => &InferenceImageAdapter,
        Wire::KeylessImage => &KeylessImageAdapter,
    }
}

fn with_headers(mut builder: RequestBuilder, candidate: &Candidate) -> RequestBuilder {
    for (name, value) in &candidate.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn with_bearer(builder: RequestBuilder, candidate: &Candidate) -> RequestBuilder {
    match &candidate.credential {
        Some(key) => builder.bearer_auth(key.expose()),
        None => builder,
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

// ============================================================================
// OpenAI-compatible chat completions (Hugging Face router, OpenRouter)
// ============================================================================

pub struct OpenAiChatAdapter;

#[async_trait]
impl ProviderAdapter for OpenAiChatAdapter {
    fn request(
        &self,
        client: &Client,
        candidate: &Candidate,
        prompt: &str,
    ) -> Result<RequestBuilder, AttemptError> {
        let body = ChatCompletionRequest::user_prompt(&candidate.model, prompt)
            .with_temperature(candidate.temperature);

        let builder = with_bearer(client.post(&candidate.endpoint), candidate).json(&body);
        Ok(with_headers(builder, candidate))
    }

    async fn extract(
        &self,
        response: Response,
        candidate: &Candidate,
        _limits: &AttemptLimits,
    ) -> Result<Extracted, AttemptError> {
        let body: ChatCompletionResponse = response.json().await.map_err(AttemptError::decode)?;

        let message = body.first_message().ok_or(AttemptError::EmptyResult)?;
        let content = non_empty(message.content.as_deref());
        let text = match candidate.extraction {
            ExtractionRule::MessageContentOrReasoning => content
                .or_else(|| non_empty(message.reasoning_content.as_deref()))
                .or_else(|| non_empty(message.reasoning.as_deref())),
            _ => content,
        }
        .ok_or(AttemptError::EmptyResult)?;

        Ok(Extracted {
            payload: Payload::Text(text.to_string()),
            echoed_model: body.echoed_model().map(str::to_string),
        })
    }
}

// ============================================================================
// Google Gemini generateContent
// ============================================================================

pub struct GeminiAdapter;

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn request(
        &self,
        client: &Client,
        candidate: &Candidate,
        prompt: &str,
    ) -> Result<RequestBuilder, AttemptError> {
        let url = format!(
            "{}/models/{}:generateContent",
            candidate.endpoint.trim_end_matches('/'),
            candidate.model
        );
        let body = GeminiRequest::user_prompt(prompt, candidate.temperature);

        let mut builder = client.post(url).json(&body);
        if let Some(key) = &candidate.credential {
            builder = builder.query(&[("key", key.expose())]);
        }
        Ok(with_headers(builder, candidate))
    }

    async fn extract(
        &self,
        response: Response,
        _candidate: &Candidate,
        _limits: &AttemptLimits,
    ) -> Result<Extracted, AttemptError> {
        let body: GeminiResponse = response.json().await.map_err(AttemptError::decode)?;
        let text = non_empty(body.first_text()).ok_or(AttemptError::EmptyResult)?;

        Ok(Extracted {
            payload: Payload::Text(text.to_string()),
            echoed_model: None,
        })
    }
}

// ============================================================================
// Image providers
// ============================================================================

/// Hugging Face inference: POST `<endpoint>/<model>` with `{"inputs": prompt}`
pub struct InferenceImageAdapter;

#[async_trait]
impl ProviderAdapter for InferenceImageAdapter {
    fn request(
        &self,
        client: &Client,
        candidate: &Candidate,
        prompt: &str,
    ) -> Result<RequestBuilder, AttemptError> {
        let url = format!(
            "{}/{}",
            candidate.endpoint.trim_end_matches('/'),
            candidate.model
        );
        let builder = with_bearer(client.post(url), candidate).json(&json!({ "inputs": prompt }));
        Ok(with_headers(builder, candidate))
    }

    async fn extract(
        &self,
        response: Response,
        _candidate: &Candidate,
        limits: &AttemptLimits,
    ) -> Result<Extracted, AttemptError> {
        read_image(response, limits).await
    }
}

/// Keyless endpoint: GET `<endpoint>/prompt/<url-encoded prompt>`
pub struct KeylessImageAdapter;

#[async_trait]
impl ProviderAdapter for KeylessImageAdapter {
    fn request(
        &self,
        client: &Client,
        candidate: &Candidate,
        prompt: &str,
    ) -> Result<RequestBuilder, AttemptError> {
        let mut url = Url::parse(&candidate.endpoint).map_err(|e| AttemptError::Transport {
            message: format!("invalid endpoint {}: {}", candidate.endpoint, e),
        })?;
        url.path_segments_mut()
            .map_err(|_| AttemptError::Transport {
                message: format!("endpoint cannot take a path: {}", candidate.endpoint),
            })?
            .pop_if_empty()
            .push("prompt")
            .push(prompt);
        url.query_pairs_mut()
            .append_pair("width", "1024")
            .append_pair("height", "768")
            .append_pair("nologo", "true");

        Ok(with_headers(client.get(url), candidate))
    }

    async fn extract(
        &self,
        response: Response,
        _candidate: &Candidate,
        limits: &AttemptLimits,
    ) -> Result<Extracted, AttemptError> {
        read_image(response, limits).await
    }
}

async fn read_image(response: Response, limits: &AttemptLimits) -> Result<Extracted, AttemptError> {
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_IMAGE_CONTENT_TYPE.to_string());

    // Some providers answer 200 with a JSON status object while a model loads
    if content_type == "application/json" || content_type.starts_with("text/") {
        let body = read_bounded(response, limits.max_payload_bytes).await?;
        return Err(AttemptError::Decode {
            message: format!(
                "expected image, got {}: {}",
                content_type,
                crate::utils::truncate_str(&String::from_utf8_lossy(&body), 200)
            ),
        });
    }

    let bytes = read_bounded(response, limits.max_payload_bytes).await?;
    if bytes.is_empty() {
        return Err(AttemptError::EmptyResult);
    }

    Ok(Extracted {
        payload: Payload::Binary {
            bytes,
            content_type,
        },
        echoed_model: None,
    })
}

/// Read a body chunk by chunk, refusing anything larger than `limit`
pub async fn read_bounded(mut response: Response, limit: usize) -> Result<Vec<u8>, AttemptError> {
    if let Some(length) = response.content_length() {
        if length > limit as u64 {
            return Err(AttemptError::PayloadTooLarge { limit });
        }
    }

    let mut buffer = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(AttemptError::transport)? {
        if buffer.len() + chunk.len() > limit {
            return Err(AttemptError::PayloadTooLarge { limit });
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}
