//! Tracked resource definitions

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::sync::extractor::{
    DEFAULT_VERSION_FIELD, HtmlCommentExtractor, JsonFieldExtractor, VersionExtractor,
};

/// Kind of content a tracked resource holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// JSON document carrying a version field
    Json,
    /// HTML fragment carrying a `<!-- version: X -->` comment
    Html,
}

impl ResourceKind {
    /// Returns the string representation of the resource kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Json => "json",
            ResourceKind::Html => "html",
        }
    }

    /// Builds the extraction rule for this kind
    ///
    /// `version_field` only applies to JSON content and defaults to `version`.
    pub fn extractor(&self, version_field: Option<&str>) -> Arc<dyn VersionExtractor> {
        match self {
            ResourceKind::Json => Arc::new(JsonFieldExtractor::new(
                version_field.unwrap_or(DEFAULT_VERSION_FIELD),
            )),
            ResourceKind::Html => Arc::new(HtmlCommentExtractor::new()),
        }
    }
}

/// One (candidate sources, local cache path, local version path, rule) tuple
#[derive(Debug, Clone)]
pub struct TrackedResource {
    /// Label used in diagnostics (e.g., "config", "panel")
    pub name: String,
    pub kind: ResourceKind,
    /// Candidate locations, tried in order
    pub sources: Vec<String>,
    pub content_path: PathBuf,
    pub version_path: PathBuf,
    pub extractor: Arc<dyn VersionExtractor>,
}

impl TrackedResource {
    /// Creates a resource using the default extraction rule for `kind`
    pub fn new(
        name: &str,
        kind: ResourceKind,
        sources: Vec<String>,
        content_path: impl AsRef<Path>,
        version_path: impl AsRef<Path>,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            sources,
            content_path: content_path.as_ref().to_path_buf(),
            version_path: version_path.as_ref().to_path_buf(),
            extractor: kind.extractor(None),
        }
    }

    /// Replaces the extraction rule
    pub fn with_extractor(mut self, extractor: Arc<dyn VersionExtractor>) -> Self {
        self.extractor = extractor;
        self
    }
}
