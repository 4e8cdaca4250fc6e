//! Inbound request and response bodies of the gateway's own HTTP API

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

// ============================================================================
// Text completion
// ============================================================================

/// POST /api/ai
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AiRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Prompt is required"))]
    pub prompt: String,

    /// Selects the prompt template and the model priority list
    #[serde(default)]
    pub action: Option<String>,

    /// Article title for news desk actions
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    pub result: String,
    /// Label of the provider/model/key that answered
    pub model: String,
}

/// POST /api/translate
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TranslateRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translation: String,
    pub model: String,
}

// ============================================================================
// Equipment workflow
// ============================================================================

/// Equipment description entered by the engineer
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Equipment {
    #[serde(rename = "type", default)]
    #[validate(length(min = 1, message = "Equipment type is required"))]
    pub kind: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Equipment model is required"))]
    pub model: String,

    #[serde(default)]
    pub manufacturer: Option<String>,

    /// Process site or installation
    #[serde(default)]
    pub site: Option<String>,

    /// Year of manufacture; the UI sends either a number or a string
    #[serde(default)]
    pub year: Option<Value>,
}

impl Equipment {
    /// "<manufacturer> <model> (<type>)"
    pub fn display_name(&self) -> String {
        match self.manufacturer.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            Some(manufacturer) => format!("{} {} ({})", manufacturer, self.model, self.kind),
            None => format!("{} ({})", self.model, self.kind),
        }
    }

    pub fn year_text(&self) -> Option<String> {
        match self.year.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// POST /api/tables
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TableRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Stage is required"))]
    pub stage: String,

    #[serde(default)]
    #[validate(nested)]
    pub equipment: Equipment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableResponse {
    pub stage: String,

    /// Parsed rows for table stages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Value>>,

    /// Free text for narrative stages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    pub model: String,
}

// ============================================================================
// Image generation
// ============================================================================

/// POST /api/image
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImageRequest {
    #[serde(rename = "type", default)]
    #[validate(length(min = 1, message = "Equipment type is required"))]
    pub kind: String,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub manufacturer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    /// `data:<content-type>;base64,<...>`
    pub image: String,
    pub model: String,
}

// ============================================================================
// Headlines and stats
// ============================================================================

/// One aggregated headline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub link: String,
    /// Region name the headline was collected for
    pub source: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeadlinesQuery {
    #[serde(default)]
    pub category: Option<String>,
}

/// POST /api/stats
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsUpdate {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub entry: Option<Value>,
}

/// First human-readable message out of a validation failure
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    find_message(errors).unwrap_or_else(|| errors.to_string())
}

fn find_message(errors: &ValidationErrors) -> Option<String> {
    errors.errors().values().find_map(|kind| match kind {
        ValidationErrorsKind::Field(errs) => errs
            .iter()
            .find_map(|err| err.message.as_ref().map(|m| m.to_string())),
        ValidationErrorsKind::Struct(inner) => find_message(inner),
        ValidationErrorsKind::List(items) => items.values().find_map(|inner| find_message(inner)),
    })
}
