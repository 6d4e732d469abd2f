//! Host registration and startup initialisation
//!
//! The host discovers the plugin through [`PluginManifest`], which maps the
//! plugin name to its web asset directory. [`initialize`] is the single
//! startup entry point: it optionally refreshes the tracked resources and
//! always hands back the manifest, whatever happened on the network.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::{FETCH_TIMEOUT_SECS, load_config};
use crate::sync::http::HttpFetcher;
use crate::sync::resource::{ResourceKind, TrackedResource};
use crate::sync::store::read_version;
use crate::sync::versioned::{SyncOutcome, VersionedFetcher};

/// Name under which the web directory is registered with the host
pub const PLUGIN_NAME: &str = "ComfyUI-LaosHe-Linkba";

/// Web asset directory, relative to the plugin directory
pub const WEB_DIR_NAME: &str = "web";

/// Registration declaration read by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PluginManifest {
    pub extension_web_dirs: BTreeMap<String, PathBuf>,
    /// The plugin provides no graph nodes
    pub node_class_mappings: BTreeMap<String, String>,
    pub node_display_name_mappings: BTreeMap<String, String>,
}

impl PluginManifest {
    pub fn new(plugin_dir: &Path) -> Self {
        Self {
            extension_web_dirs: extension_web_dirs(plugin_dir),
            node_class_mappings: BTreeMap::new(),
            node_display_name_mappings: BTreeMap::new(),
        }
    }
}

/// Options controlled by the host's startup sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOptions {
    /// Whether the remote refresh runs at all
    pub refresh: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self { refresh: true }
    }
}

/// Returns the web asset directory of the plugin
pub fn web_directory(plugin_dir: &Path) -> PathBuf {
    plugin_dir.join(WEB_DIR_NAME)
}

/// Returns the {plugin name → web directory} mapping
pub fn extension_web_dirs(plugin_dir: &Path) -> BTreeMap<String, PathBuf> {
    BTreeMap::from([(PLUGIN_NAME.to_string(), web_directory(plugin_dir))])
}

/// Initialise the plugin once at host startup
///
/// Never fails: refresh problems are logged and the manifest is returned
/// regardless.
pub async fn initialize(plugin_dir: &Path, options: InitOptions) -> PluginManifest {
    let web_dir = web_directory(plugin_dir);
    info!("[{}] Loading web files from: {:?}", PLUGIN_NAME, web_dir);

    let config = load_config(plugin_dir);
    if !options.refresh {
        info!("[{}] Remote refresh disabled by host", PLUGIN_NAME);
    } else if !config.refresh.enabled {
        info!("[{}] Remote refresh disabled by configuration", PLUGIN_NAME);
    } else {
        let timeout_secs = match config.refresh.timeout_secs {
            0 => FETCH_TIMEOUT_SECS,
            secs => secs,
        };
        refresh(&config.tracked_resources(&web_dir), timeout_secs).await;
    }

    info!("[{}] Plugin loaded successfully.", PLUGIN_NAME);
    PluginManifest::new(plugin_dir)
}

/// Blocking wrapper around [`initialize`] for hosts without an async runtime
///
/// Must not be called from inside a tokio runtime.
pub fn initialize_blocking(plugin_dir: &Path, options: InitOptions) -> PluginManifest {
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime.block_on(initialize(plugin_dir, options)),
        Err(e) => {
            error!(
                "[{}] Failed to start runtime, skipping refresh: {}",
                PLUGIN_NAME, e
            );
            PluginManifest::new(plugin_dir)
        }
    }
}

/// Local state of one tracked resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceStatus {
    pub name: String,
    pub kind: ResourceKind,
    pub content_path: PathBuf,
    /// Version recorded in the local marker, if any
    pub local_version: Option<String>,
}

/// Report the locally cached version of every tracked resource
pub async fn status(plugin_dir: &Path) -> Vec<ResourceStatus> {
    let config = load_config(plugin_dir);
    let mut statuses = Vec::new();
    for resource in config.tracked_resources(&web_directory(plugin_dir)) {
        let local_version = read_version(&resource.version_path).await;
        statuses.push(ResourceStatus {
            name: resource.name,
            kind: resource.kind,
            content_path: resource.content_path,
            local_version,
        });
    }
    statuses
}

async fn refresh(resources: &[TrackedResource], timeout_secs: u64) {
    let fetcher = match HttpFetcher::new(Duration::from_secs(timeout_secs)) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("[{}] Failed to create HTTP client: {}", PLUGIN_NAME, e);
            return;
        }
    };

    let outcomes = VersionedFetcher::new(fetcher).sync_all(resources).await;
    let updated = outcomes
        .iter()
        .filter(|o| matches!(o, SyncOutcome::Updated { .. }))
        .count();
    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, SyncOutcome::Unavailable | SyncOutcome::Failed { .. }))
        .count();

    if failed > 0 {
        warn!(
            "[{}] Refresh finished: {} updated, {} failed of {}",
            PLUGIN_NAME,
            updated,
            failed,
            outcomes.len()
        );
    } else {
        info!(
            "[{}] Refresh finished: {} updated of {}",
            PLUGIN_NAME,
            updated,
            outcomes.len()
        );
    }
}
