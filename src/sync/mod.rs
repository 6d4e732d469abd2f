//! Versioned remote file sync
//!
//! Refreshes locally cached files from an ordered list of remote candidates,
//! replacing the local copy only when the remote version token differs from
//! the one recorded in the local version marker.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌─────────────┐
//! │   Fetcher   │────▶│ VersionedFetcher │────▶│    Store    │
//! │ (transport) │     │  (sync driver)   │     │ (atomic fs) │
//! └─────────────┘     └──────────────────┘     └─────────────┘
//!                              │
//!                              ▼
//!                     ┌──────────────────┐
//!                     │ VersionExtractor │
//!                     │ (json / html)    │
//!                     └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`fetcher`]: Fetcher trait for retrieving candidate content
//! - [`http`]: reqwest-backed fetcher
//! - [`extractor`]: Version extraction rules per content kind
//! - [`resource`]: Tracked resource definitions
//! - [`store`]: Version marker reads and atomic file writes
//! - [`versioned`]: The sync driver
//! - [`error`]: Error types for fetch, extraction and store operations

pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod http;
pub mod resource;
pub mod store;
pub mod versioned;

pub use resource::{ResourceKind, TrackedResource};
pub use versioned::{SyncOutcome, VersionedFetcher};
