//! Web asset registration and startup refresh for the ComfyUI-LaosHe-Linkba plugin
//!
//! # Modules
//!
//! - [`plugin`]: Host registration manifest and the startup entry point
//! - [`sync`]: Versioned remote file sync
//! - [`config`]: Configuration file, constants and data paths
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod logging;
pub mod plugin;
pub mod sync;
