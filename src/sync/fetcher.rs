//! Fetcher trait for retrieving candidate content from remote locations

#[cfg(test)]
use mockall::automock;

use crate::sync::error::FetchError;

/// Trait for fetching the raw body behind a candidate location
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the body at `url` as UTF-8 text
    ///
    /// # Returns
    /// * `Ok(String)` - The response body
    /// * `Err(FetchError)` - Timeout, connection failure or a non-success status
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
