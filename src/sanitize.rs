//! Conversion of untrusted model output into a bounded `AnalyzeResult`.
//!
//! The model is asked for a fixed JSON shape but nothing guarantees it. Every
//! field has a defined fallback except `confidence`, which must be readable
//! as a number.

use crate::analysis::{AnalyzeResult, Language};
use crate::category::Catalog;
use serde_json::{Map, Value};
use thiserror::Error;

/// Upper bound on `tags` and `key_points`.
pub const MAX_LIST_ITEMS: usize = 5;

/// Confidence assumed when the model omits the field.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Ceiling applied when the category had to be replaced with the fallback.
pub const UNKNOWN_CATEGORY_CONFIDENCE_CAP: f64 = 0.5;

pub const TAGS_PLACEHOLDER: &str = "untagged";
pub const KEY_POINTS_PLACEHOLDER: &str = "N/A";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("model output is not a JSON object (got {0})")]
    NotAnObject(&'static str),
    /// `value` is an excerpt of the model output; kept out of `Display`
    #[error("confidence is not a number")]
    InvalidConfidence { value: String },
}

/// Schema checker bound to a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer {
    catalog: &'static Catalog,
}

impl Sanitizer {
    pub fn new(catalog: &'static Catalog) -> Self {
        Self { catalog }
    }

    /// Check and coerce a decoded model reply.
    pub fn sanitize(&self, raw: &Value) -> Result<AnalyzeResult, ValidationError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| ValidationError::NotAnObject(json_kind(raw)))?;

        let requested = obj.get("category").and_then(Value::as_str);
        let (category_name, known) = self.catalog.resolve(requested);
        let category = match requested {
            Some(slug) if known => slug.to_string(),
            _ => self.catalog.fallback().slug.to_string(),
        };

        let mut confidence = read_confidence(obj)?;
        if !known {
            confidence = confidence.min(UNKNOWN_CATEGORY_CONFIDENCE_CAP);
        }
        let confidence = confidence.clamp(0.0, 1.0);

        let tags = read_list(obj.get("tags"), TAGS_PLACEHOLDER);
        let key_points = read_list(obj.get("key_points"), KEY_POINTS_PLACEHOLDER);

        let summary = match obj.get("summary") {
            None | Some(Value::Null) => String::new(),
            Some(value) => value_to_text(value),
        };

        let language = obj
            .get("language")
            .and_then(Value::as_str)
            .and_then(Language::from_code)
            .unwrap_or(Language::En);

        Ok(AnalyzeResult {
            category,
            category_name: category_name.to_string(),
            confidence,
            tags,
            summary,
            key_points,
            language,
        })
    }
}

/// Sanitize against the built-in catalog.
pub fn sanitize(raw: &Value) -> Result<AnalyzeResult, ValidationError> {
    Sanitizer::new(Catalog::builtin()).sanitize(raw)
}

fn read_confidence(obj: &Map<String, Value>) -> Result<f64, ValidationError> {
    let value = match obj.get("confidence") {
        None => return Ok(DEFAULT_CONFIDENCE),
        Some(value) => value,
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(f) if !f.is_nan() => Ok(f),
        _ => Err(ValidationError::InvalidConfidence {
            value: truncate_for_error(value),
        }),
    }
}

fn read_list(value: Option<&Value>, placeholder: &str) -> Vec<String> {
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .take(MAX_LIST_ITEMS)
            .map(value_to_text)
            .collect(),
        _ => Vec::new(),
    };

    if items.is_empty() {
        vec![placeholder.to_string()]
    } else {
        items
    }
}

/// Strings verbatim, everything else as compact JSON text
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn truncate_for_error(value: &Value) -> String {
    const LIMIT: usize = 64;
    let text = value.to_string();
    match text.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}
