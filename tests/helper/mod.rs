//! Shared helpers for integration tests

pub mod resource;

pub use resource::{TestPlugin, html_resource, json_resource, read};
