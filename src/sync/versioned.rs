//! Versioned remote file sync
//!
//! Tries each candidate of a tracked resource in order, keeps the first one
//! whose content yields a version token, and replaces the local copy when
//! that token differs from the local version marker.

use tracing::{debug, error, info, warn};

use crate::sync::fetcher::Fetcher;
use crate::sync::resource::TrackedResource;
use crate::sync::store::{read_version, write_atomic};

/// Content fetched from a candidate together with its version token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFetchResult {
    pub content: String,
    pub version: String,
    /// Candidate location the content came from
    pub source: String,
}

/// Result of syncing one tracked resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Local files were replaced
    Updated {
        previous: Option<String>,
        current: String,
        source: String,
    },
    /// Remote version equals the local marker; nothing written
    UpToDate { version: String, source: String },
    /// No candidate produced usable content; nothing written
    Unavailable,
    /// Writing the local files failed
    Failed { reason: String },
}

/// Drives the sync of tracked resources through a [`Fetcher`]
pub struct VersionedFetcher<F: Fetcher> {
    fetcher: F,
}

impl<F: Fetcher> VersionedFetcher<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Sync every resource, one after another
    pub async fn sync_all(&self, resources: &[TrackedResource]) -> Vec<SyncOutcome> {
        let mut outcomes = Vec::with_capacity(resources.len());
        for resource in resources {
            outcomes.push(self.sync(resource).await);
        }
        outcomes
    }

    /// Sync a single resource
    ///
    /// Every failure is logged and folded into the returned outcome.
    pub async fn sync(&self, resource: &TrackedResource) -> SyncOutcome {
        let label = format!("{}/{}", resource.kind.as_str(), resource.name);

        let local_version = read_version(&resource.version_path).await;
        debug!(
            "{}: local version {}",
            label,
            local_version.as_deref().unwrap_or("unknown")
        );

        let Some(remote) = self.fetch_first_valid(resource, &label).await else {
            error!(
                "{}: no candidate source yielded a valid version; local files left untouched",
                label
            );
            return SyncOutcome::Unavailable;
        };

        if local_version.as_deref() == Some(remote.version.as_str()) {
            info!("{}: up to date (version {})", label, remote.version);
            return SyncOutcome::UpToDate {
                version: remote.version,
                source: remote.source,
            };
        }

        // Content first: an interruption before the marker is written leaves
        // the old marker, so the next run downloads again.
        if let Err(e) = write_atomic(&resource.content_path, remote.content.as_bytes()).await {
            error!("{}: failed to write content: {}", label, e);
            return SyncOutcome::Failed {
                reason: e.to_string(),
            };
        }
        if let Err(e) = write_atomic(&resource.version_path, remote.version.as_bytes()).await {
            error!("{}: failed to write version marker: {}", label, e);
            return SyncOutcome::Failed {
                reason: e.to_string(),
            };
        }

        info!(
            "{}: updated {} -> {} from {}",
            label,
            local_version.as_deref().unwrap_or("unknown"),
            remote.version,
            remote.source
        );

        SyncOutcome::Updated {
            previous: local_version,
            current: remote.version,
            source: remote.source,
        }
    }

    async fn fetch_first_valid(
        &self,
        resource: &TrackedResource,
        label: &str,
    ) -> Option<RemoteFetchResult> {
        for source in &resource.sources {
            let content = match self.fetcher.fetch(source).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("{}: failed to fetch {}: {}", label, source, e);
                    continue;
                }
            };

            match resource.extractor.extract(&content) {
                Ok(version) => {
                    debug!("{}: {} has version {}", label, source, version);
                    return Some(RemoteFetchResult {
                        content,
                        version,
                        source: source.clone(),
                    });
                }
                Err(e) => {
                    warn!("{}: discarding content from {}: {}", label, source, e);
                }
            }
        }
        None
    }
}
