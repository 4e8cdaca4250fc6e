//! Provider fallback resolver
//!
//! Walks an ordered candidate list strictly sequentially, one request in
//! flight at a time, and stops at the first candidate that yields a usable
//! result. Every failure is recorded as the last error and iteration moves
//! on; there is no retry, backoff or memory of bad keys between requests.

use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use super::adapter::{adapter_for, read_bounded, AttemptLimits, Extracted};
use super::candidate::Candidate;
use super::outcome::{AttemptError, AttemptFailure, Outcome, Resolution};
use crate::config::{ApiKey, ProviderSettings};
use crate::utils::{truncate_with_suffix, with_timeout};

/// Rejection bodies are kept for diagnostics up to this size
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

pub struct FallbackResolver {
    client: Client,
    limits: AttemptLimits,
}

impl FallbackResolver {
    pub fn new(client: Client, limits: AttemptLimits) -> Self {
        Self { client, limits }
    }

    /// Build a resolver with a shared client configured from provider settings
    pub fn from_settings(providers: &ProviderSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(providers.request_timeout_seconds))
            .build()?;

        Ok(Self::new(
            client,
            AttemptLimits {
                max_payload_bytes: providers.max_image_bytes,
            },
        ))
    }

    /// Try `candidates` in order until one produces a result
    pub async fn resolve(&self, prompt: &str, candidates: &[Candidate]) -> Outcome {
        let mut last_error: Option<AttemptFailure> = None;

        for (position, candidate) in candidates.iter().enumerate() {
            tracing::debug!(
                tier = candidate.tier,
                provider = %candidate.provider,
                model = %candidate.model,
                key_index = candidate.key_index,
                "Trying candidate"
            );

            match self.attempt(candidate, prompt).await {
                Ok(extracted) => {
                    let model = extracted
                        .echoed_model
                        .clone()
                        .unwrap_or_else(|| candidate.model.clone());
                    let label = candidate.label_for(extracted.echoed_model.as_deref());

                    tracing::info!(
                        tier = candidate.tier,
                        provider = %candidate.provider,
                        model = %model,
                        label = %label,
                        attempts = position + 1,
                        "Candidate succeeded"
                    );

                    return Outcome::Success(Resolution {
                        payload: extracted.payload,
                        label,
                        provider: candidate.provider,
                        model,
                        key_index: candidate.credential.as_ref().map(|_| candidate.key_index),
                        attempts: position + 1,
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        tier = candidate.tier,
                        provider = %candidate.provider,
                        model = %candidate.model,
                        key = %candidate.credential.as_ref().map_or_else(|| "-".to_string(), ApiKey::masked),
                        error = %error,
                        "Candidate failed, moving on"
                    );
                    last_error = Some(AttemptFailure::new(candidate, error));
                }
            }
        }

        tracing::error!(
            attempts = candidates.len(),
            last_error = ?last_error.as_ref().map(|f| f.error.to_string()),
            "All candidates exhausted"
        );

        Outcome::Exhausted {
            last_error,
            attempts: candidates.len(),
        }
    }

    /// One request against one candidate
    async fn attempt(&self, candidate: &Candidate, prompt: &str) -> Result<Extracted, AttemptError> {
        let adapter = adapter_for(candidate.provider.wire());
        let request = adapter.request(&self.client, candidate, prompt)?;

        let call = async {
            let response = request.send().await.map_err(AttemptError::transport)?;
            if !response.status().is_success() {
                return Err(rejection(response).await);
            }
            adapter.extract(response, candidate, &self.limits).await
        };

        with_timeout(candidate.timeout, call)
            .await
            .map_err(|err| {
                err.flatten(|after| AttemptError::Transport {
                    message: format!("timed out after {} ms", after.as_millis()),
                })
            })
    }
}

/// Capture a non-2xx response as a provider rejection
async fn rejection(response: Response) -> AttemptError {
    let status = response.status().as_u16();

    let body = match read_bounded(response, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            serde_json::from_str::<Value>(&text).unwrap_or_else(|_| {
                Value::String(truncate_with_suffix(text.trim(), 500, "..."))
            })
        }
        Err(err) => Value::String(err.to_string()),
    };

    AttemptError::ProviderRejection { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fallback::candidate::{ExtractionRule, LabelStyle, ProviderKind};
    use crate::services::fallback::outcome::Payload;
    use httpmock::prelude::*;
    use serde_json::json;

    fn resolver() -> FallbackResolver {
        FallbackResolver::new(
            Client::new(),
            AttemptLimits {
                max_payload_bytes: 1024,
            },
        )
    }

    fn openrouter(server: &MockServer, model: &str, key: &str, index: usize) -> Candidate {
        Candidate::new(
            3,
            ProviderKind::OpenRouter,
            server.url("/chat"),
            model,
            ExtractionRule::MessageContent,
        )
        .with_credential(ApiKey::new(key).unwrap(), index)
        .with_label(LabelStyle::Keyed("OpenRouter".into()))
    }

    fn chat_reply(content: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    #[tokio::test]
    async fn test_iterates_keys_within_model_before_next_model() {
        let server = MockServer::start_async().await;
        let m1k1 = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat")
                    .header("authorization", "Bearer key-one-aaaa")
                    .json_body_includes(json!({"model": "m1"}).to_string());
                then.status(429).json_body(json!({"error": "rate limited"}));
            })
            .await;
        let m1k2 = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat")
                    .header("authorization", "Bearer key-two-bbbb")
                    .json_body_includes(json!({"model": "m1"}).to_string());
                then.status(200).json_body(chat_reply("from key two"));
            })
            .await;
        let m2 = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat")
                    .json_body_includes(json!({"model": "m2"}).to_string());
                then.status(200).json_body(chat_reply("never"));
            })
            .await;

        let candidates = vec![
            openrouter(&server, "m1", "key-one-aaaa", 1),
            openrouter(&server, "m1", "key-two-bbbb", 2),
            openrouter(&server, "m2", "key-one-aaaa", 1),
            openrouter(&server, "m2", "key-two-bbbb", 2),
        ];

        let resolution = resolver()
            .resolve("hello", &candidates)
            .await
            .into_result()
            .unwrap();

        assert_eq!(resolution.payload, Payload::Text("from key two".into()));
        assert_eq!(resolution.label, "OpenRouter Key #2 (m1)");
        assert_eq!(resolution.key_index, Some(2));
        assert_eq!(resolution.attempts, 2);
        m1k1.assert_calls_async(1).await;
        m1k2.assert_calls_async(1).await;
        m2.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn test_empty_content_moves_on_and_echoed_model_wins() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat")
                    .json_body_includes(json!({"model": "m1"}).to_string());
                then.status(200).json_body(chat_reply("   "));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat")
                    .json_body_includes(json!({"model": "m2"}).to_string());
                then.status(200).json_body(json!({
                    "model": "vendor/m2-0425",
                    "choices": [{"message": {"content": "answer"}}]
                }));
            })
            .await;

        let candidates = vec![
            openrouter(&server, "m1", "key-one-aaaa", 1),
            openrouter(&server, "m2", "key-one-aaaa", 1),
        ];

        let resolution = resolver()
            .resolve("hello", &candidates)
            .await
            .into_result()
            .unwrap();

        assert_eq!(resolution.model, "vendor/m2-0425");
        assert_eq!(resolution.label, "OpenRouter Key #1 (vendor/m2-0425)");
    }

    #[tokio::test]
    async fn test_reasoning_fallback_only_when_configured() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat");
                then.status(200).json_body(json!({
                    "choices": [{"message": {"content": "", "reasoning_content": "thought it through"}}]
                }));
            })
            .await;

        let strict = openrouter(&server, "m1", "key-one-aaaa", 1);
        let outcome = resolver().resolve("q", std::slice::from_ref(&strict)).await;
        assert!(!outcome.is_success());

        let mut lenient = strict.clone();
        lenient.extraction = ExtractionRule::MessageContentOrReasoning;
        let resolution = resolver()
            .resolve("q", &[lenient])
            .await
            .into_result()
            .unwrap();
        assert_eq!(resolution.payload, Payload::Text("thought it through".into()));
    }

    #[tokio::test]
    async fn test_timeout_is_a_transport_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(chat_reply("too late"));
            })
            .await;

        let candidate = openrouter(&server, "m1", "key-one-aaaa", 1)
            .with_timeout(Duration::from_millis(50));

        match resolver().resolve("q", &[candidate]).await {
            Outcome::Exhausted {
                last_error: Some(failure),
                attempts,
            } => {
                assert_eq!(attempts, 1);
                match failure.error {
                    AttemptError::Transport { message } => assert!(message.contains("timed out")),
                    other => panic!("expected transport error, got {other:?}"),
                }
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exhaustion_reports_last_rejection_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat");
                then.status(401).body("invalid key");
            })
            .await;

        let candidates = vec![
            openrouter(&server, "m1", "key-one-aaaa", 1),
            openrouter(&server, "m2", "key-one-aaaa", 1),
        ];

        let err = resolver()
            .resolve("q", &candidates)
            .await
            .into_result()
            .unwrap_err();

        match err {
            crate::error::ApiError::Exhausted {
                details: Some(details),
                ..
            } => {
                assert_eq!(details["model"], "m2");
                assert_eq!(details["error"]["status"], 401);
                assert_eq!(details["error"]["body"], "invalid key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_candidate_list_is_exhausted_without_details() {
        let outcome = resolver().resolve("q", &[]).await;
        assert!(matches!(
            outcome,
            Outcome::Exhausted {
                last_error: None,
                attempts: 0
            }
        ));
    }

    #[tokio::test]
    async fn test_oversized_image_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/big");
                then.status(200)
                    .header("content-type", "image/png")
                    .body(vec![7u8; 4096]);
            })
            .await;

        let candidate = Candidate::new(
            1,
            ProviderKind::HuggingFaceInference,
            server.url("/models"),
            "big",
            ExtractionRule::ImageBytes,
        )
        .with_credential(ApiKey::new("hf_image_key_0001").unwrap(), 1);

        match resolver().resolve("q", &[candidate]).await {
            Outcome::Exhausted {
                last_error: Some(failure),
                ..
            } => assert!(matches!(
                failure.error,
                AttemptError::PayloadTooLarge { limit: 1024 }
            )),
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }
}
