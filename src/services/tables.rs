//! Equipment table post-processing
//!
//! Models are asked for bare JSON arrays but routinely wrap them in markdown
//! fences. Rows are parsed leniently and FMEA rows get a risk priority number.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::services::prompts::Stage;

/// FMEA factor keys multiplied into the RPN
const RPN_FACTORS: [&str; 3] = ["Probability", "Severity", "Detection"];

const FACTOR_MIN: f64 = 1.0;
const FACTOR_MAX: f64 = 10.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("model output is not a JSON array of objects")]
    NotAnArray,
}

/// Remove a surrounding ```json ... ``` fence and trim
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        // A JSON body never starts with a letter, so a leading word is a language tag
        let tag_len = if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            rest.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(rest.len())
        } else {
            0
        };
        body = &rest[tag_len..];
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Parse model output into table rows
pub fn parse_rows(text: &str) -> Result<Vec<Map<String, Value>>, TableError> {
    let value: Value = serde_json::from_str(strip_code_fences(text))
        .map_err(|e| TableError::InvalidJson(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(TableError::NotAnArray);
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(row) => Ok(row),
            _ => Err(TableError::NotAnArray),
        })
        .collect()
}

/// Numeric factor clamped to the 1-10 scale; numbers and numeric strings
/// count, anything else is 1
fn factor(row: &Map<String, Value>, key: &str) -> u64 {
    let parsed = match row.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v.round().clamp(FACTOR_MIN, FACTOR_MAX) as u64,
        _ => 1,
    }
}

/// Risk priority number: probability × severity × detection
pub fn risk_priority_number(row: &Map<String, Value>) -> u64 {
    RPN_FACTORS.iter().map(|key| factor(row, key)).product()
}

/// Parse rows for a table stage, adding `RPN` to FMEA rows
pub fn build_table(stage: Stage, text: &str) -> Result<Vec<Value>, TableError> {
    let mut rows = parse_rows(text)?;

    if stage == Stage::Fmea {
        for row in &mut rows {
            let rpn = risk_priority_number(row);
            row.insert("RPN".to_string(), Value::from(rpn));
        }
    }

    Ok(rows.into_iter().map(Value::Object).collect())
}
