//! Version extraction rules for fetched content
//!
//! Each tracked resource carries one extractor. A failed extraction is not a
//! hard error: the driver discards the candidate and moves to the next one.

use regex::Regex;
use serde_json::Value;

use crate::sync::error::ExtractError;

/// Field read from JSON content when no other field is configured
pub const DEFAULT_VERSION_FIELD: &str = "version";

/// Trait for pulling a version token out of fetched content
pub trait VersionExtractor: Send + Sync + std::fmt::Debug {
    /// Extract the version token from `content`
    fn extract(&self, content: &str) -> Result<String, ExtractError>;
}

/// Reads a top-level field of a JSON document
///
/// String values are used trimmed. Numeric values are accepted but their
/// text is re-rendered by serde_json, so `2.50` yields `"2.5"`. Quote the
/// version in published documents to keep the token byte-identical.
#[derive(Debug, Clone)]
pub struct JsonFieldExtractor {
    field: String,
}

impl JsonFieldExtractor {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
        }
    }
}

impl Default for JsonFieldExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_FIELD)
    }
}

impl VersionExtractor for JsonFieldExtractor {
    fn extract(&self, content: &str) -> Result<String, ExtractError> {
        let document: Value =
            serde_json::from_str(content).map_err(|e| ExtractError::InvalidJson(e.to_string()))?;

        let version = match document.get(&self.field) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => return Err(ExtractError::UnsupportedValue(self.field.clone())),
            None => return Err(ExtractError::MissingField(self.field.clone())),
        };

        if version.is_empty() {
            return Err(ExtractError::EmptyVersion);
        }
        Ok(version)
    }
}

/// Matches a `<!-- version: X -->` comment where X is a dotted numeric token
#[derive(Debug, Clone)]
pub struct HtmlCommentExtractor {
    marker_re: Regex,
}

impl HtmlCommentExtractor {
    pub fn new() -> Self {
        Self {
            marker_re: Regex::new(r"<!--\s*version:\s*([0-9]+(?:\.[0-9]+)*)\s*-->")
                .expect("version marker pattern is valid"),
        }
    }
}

impl Default for HtmlCommentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionExtractor for HtmlCommentExtractor {
    fn extract(&self, content: &str) -> Result<String, ExtractError> {
        self.marker_re
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(ExtractError::MissingMarker)
    }
}
