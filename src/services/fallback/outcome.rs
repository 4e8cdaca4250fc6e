//! Attempt errors and request outcomes

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::candidate::{Candidate, ProviderKind};
use crate::error::ApiError;

/// Why a single candidate attempt produced nothing usable
///
/// These never leave the resolver except as diagnostics on exhaustion.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttemptError {
    #[error("provider returned HTTP {status}")]
    ProviderRejection { status: u16, body: Value },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("response contained no usable result")]
    EmptyResult,

    #[error("response could not be decoded: {message}")]
    Decode { message: String },

    #[error("response exceeded {limit} bytes")]
    PayloadTooLarge { limit: usize },
}

impl AttemptError {
    pub fn transport(err: reqwest::Error) -> Self {
        AttemptError::Transport {
            message: err.to_string(),
        }
    }

    pub fn decode(err: reqwest::Error) -> Self {
        AttemptError::Decode {
            message: err.to_string(),
        }
    }
}

/// The last failed attempt, as reported to the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptFailure {
    pub provider: ProviderKind,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_index: Option<usize>,
    pub tier: u8,
    pub error: AttemptError,
}

impl AttemptFailure {
    pub fn new(candidate: &Candidate, error: AttemptError) -> Self {
        Self {
            provider: candidate.provider,
            model: candidate.model.clone(),
            key_index: candidate.credential.as_ref().map(|_| candidate.key_index),
            tier: candidate.tier,
            error,
        }
    }
}

/// Extracted result payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary { bytes: Vec<u8>, content_type: String },
}

impl Payload {
    /// Text payload, or `None` for binary
    pub fn into_text(self) -> Option<String> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Binary { .. } => None,
        }
    }

    /// `data:<content-type>;base64,<...>` for binary payloads
    pub fn to_data_url(&self) -> Option<String> {
        match self {
            Payload::Binary {
                bytes,
                content_type,
            } => Some(format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))),
            Payload::Text(_) => None,
        }
    }
}

/// A successful resolution
#[derive(Debug, Clone)]
pub struct Resolution {
    pub payload: Payload,
    pub label: String,
    pub provider: ProviderKind,
    /// Model actually used (echoed by the provider when it reported one)
    pub model: String,
    pub key_index: Option<usize>,
    /// Attempts made including the successful one
    pub attempts: usize,
}

/// Exactly one per top-level request
#[derive(Debug, Clone)]
pub enum Outcome {
    Success(Resolution),
    Exhausted {
        last_error: Option<AttemptFailure>,
        attempts: usize,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Convert into the API layer's result type
    pub fn into_result(self) -> Result<Resolution, ApiError> {
        match self {
            Outcome::Success(resolution) => Ok(resolution),
            Outcome::Exhausted { last_error, .. } => {
                // Diagnostics are best effort
                let details = last_error.and_then(|failure| serde_json::to_value(failure).ok());
                Err(ApiError::exhausted(details))
            }
        }
    }
}
