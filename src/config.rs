use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::sync::resource::{ResourceKind, TrackedResource};

// =============================================================================
// Constants
// =============================================================================

/// Timeout for each candidate fetch in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 15;

/// User-Agent sent with every fetch
pub const USER_AGENT: &str = concat!("ComfyUI-LaosHe-Linkba/", env!("CARGO_PKG_VERSION"));

/// Optional configuration file, looked up in the plugin directory
pub const CONFIG_FILE_NAME: &str = "linkba.json";

/// Primary location of the published web assets
const PRIMARY_BASE_URL: &str =
    "https://raw.githubusercontent.com/LaosHe/ComfyUI-LaosHe-Linkba/main/web";

/// Mirror of the published web assets
const MIRROR_BASE_URL: &str = "https://gitee.com/LaosHe/ComfyUI-LaosHe-Linkba/raw/main/web";

/// Plugin configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncConfig {
    pub refresh: RefreshConfig,
    /// Tracked resources; empty means the built-in defaults
    #[serde(deserialize_with = "deserialize_resources")]
    pub resources: Vec<ResourceConfig>,
}

/// Keep the well-formed resource entries and skip the rest
///
/// A malformed entry must not fail the whole document, otherwise the
/// `refresh` section would be replaced by the defaults along with it.
fn deserialize_resources<'de, D>(deserializer: D) -> Result<Vec<ResourceConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!("Ignoring resources: expected an array, got {}", other);
            return Ok(Vec::new());
        }
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            serde_json::from_value::<ResourceConfig>(entry)
                .inspect_err(|e| warn!("Skipping resources[{}]: {}", i, e))
                .ok()
        })
        .collect())
}

/// Startup refresh configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshConfig {
    pub enabled: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: FETCH_TIMEOUT_SECS,
        }
    }
}

/// Definition of one tracked resource
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfig {
    pub name: String,
    pub kind: ResourceKind,
    pub sources: Vec<String>,
    /// Content file, relative to the web directory unless absolute
    pub content_file: PathBuf,
    /// Version marker file, relative to the web directory unless absolute
    pub version_file: PathBuf,
    /// JSON field holding the version (JSON resources only)
    #[serde(default)]
    pub version_field: Option<String>,
}

impl ResourceConfig {
    /// Build the tracked resource with paths resolved against `web_dir`
    pub fn to_tracked(&self, web_dir: &Path) -> TrackedResource {
        TrackedResource::new(
            &self.name,
            self.kind,
            self.sources.clone(),
            web_dir.join(&self.content_file),
            web_dir.join(&self.version_file),
        )
        .with_extractor(self.kind.extractor(self.version_field.as_deref()))
    }
}

/// The JSON configuration and HTML panel shipped with the plugin
pub fn default_resources() -> Vec<ResourceConfig> {
    vec![
        ResourceConfig {
            name: "config".to_string(),
            kind: ResourceKind::Json,
            sources: vec![
                format!("{}/config.json", PRIMARY_BASE_URL),
                format!("{}/config.json", MIRROR_BASE_URL),
            ],
            content_file: PathBuf::from("config.json"),
            version_file: PathBuf::from("config.version"),
            version_field: None,
        },
        ResourceConfig {
            name: "panel".to_string(),
            kind: ResourceKind::Html,
            sources: vec![
                format!("{}/linkba.html", PRIMARY_BASE_URL),
                format!("{}/linkba.html", MIRROR_BASE_URL),
            ],
            content_file: PathBuf::from("linkba.html"),
            version_file: PathBuf::from("linkba.html.version"),
            version_field: None,
        },
    ]
}

impl SyncConfig {
    /// Tracked resources with paths resolved against `web_dir`
    pub fn tracked_resources(&self, web_dir: &Path) -> Vec<TrackedResource> {
        if self.resources.is_empty() {
            default_resources()
                .iter()
                .map(|r| r.to_tracked(web_dir))
                .collect()
        } else {
            self.resources.iter().map(|r| r.to_tracked(web_dir)).collect()
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Returns the path of the optional configuration file
pub fn config_path(plugin_dir: &Path) -> PathBuf {
    plugin_dir.join(CONFIG_FILE_NAME)
}

/// Load the configuration from the plugin directory
///
/// A missing file yields the defaults. An unreadable or invalid file is
/// logged and also yields the defaults.
pub fn load_config(plugin_dir: &Path) -> SyncConfig {
    read_config(&config_path(plugin_dir))
        .inspect_err(|e| warn!("{}; using defaults", e))
        .ok()
        .flatten()
        .unwrap_or_default()
}

fn read_config(path: &Path) -> Result<Option<SyncConfig>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No configuration at {:?}", path);
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Returns the path to the data directory for linkba-sync.
/// Uses $XDG_DATA_HOME/linkba-sync if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/linkba-sync,
/// or ./linkba-sync if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("linkba-sync.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("linkba-sync")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn sync_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<SyncConfig>(json!({
            "refresh": {
                "timeoutSecs": 5
            }
        }))
        .unwrap();

        assert!(result.refresh.enabled);
        assert_eq!(result.refresh.timeout_secs, 5);
        assert!(result.resources.is_empty());
    }

    #[test]
    fn sync_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<SyncConfig>(json!({
            "refresh": { "enabled": false, "timeoutSecs": 30 },
            "resources": [{
                "name": "config",
                "kind": "json",
                "sources": ["https://a.example/c.json", "https://b.example/c.json"],
                "contentFile": "c.json",
                "versionFile": "c.version",
                "versionField": "rev"
            }]
        }))
        .unwrap();

        assert_eq!(
            result,
            SyncConfig {
                refresh: RefreshConfig {
                    enabled: false,
                    timeout_secs: 30,
                },
                resources: vec![ResourceConfig {
                    name: "config".to_string(),
                    kind: ResourceKind::Json,
                    sources: vec![
                        "https://a.example/c.json".to_string(),
                        "https://b.example/c.json".to_string(),
                    ],
                    content_file: PathBuf::from("c.json"),
                    version_file: PathBuf::from("c.version"),
                    version_field: Some("rev".to_string()),
                }],
            }
        );
    }

    #[test]
    fn tracked_resources_default_to_json_and_html_under_web_dir() {
        let web_dir = PathBuf::from("/plugins/linkba/web");
        let resources = SyncConfig::default().tracked_resources(&web_dir);

        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].kind, ResourceKind::Json);
        assert_eq!(resources[0].content_path, web_dir.join("config.json"));
        assert_eq!(resources[0].version_path, web_dir.join("config.version"));
        assert_eq!(resources[0].sources.len(), 2);
        assert_eq!(resources[1].kind, ResourceKind::Html);
        assert_eq!(resources[1].content_path, web_dir.join("linkba.html"));
        assert!(resources.iter().all(|r| r.sources[0].starts_with("https://")));
    }

    #[test]
    fn tracked_resources_keep_absolute_paths() {
        let config = SyncConfig {
            resources: vec![ResourceConfig {
                name: "panel".to_string(),
                kind: ResourceKind::Html,
                sources: vec![],
                content_file: PathBuf::from("/srv/panel.html"),
                version_file: PathBuf::from("panel.version"),
                version_field: None,
            }],
            ..Default::default()
        };

        let resources = config.tracked_resources(Path::new("/plugins/linkba/web"));

        assert_eq!(resources[0].content_path, PathBuf::from("/srv/panel.html"));
        assert_eq!(
            resources[0].version_path,
            PathBuf::from("/plugins/linkba/web/panel.version")
        );
    }

    #[test]
    fn load_config_returns_defaults_when_file_missing() {
        let temp_dir = TempDir::new().unwrap();

        assert_eq!(load_config(temp_dir.path()), SyncConfig::default());
    }

    #[test]
    fn load_config_returns_defaults_when_file_invalid() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(config_path(temp_dir.path()), "{ not json").unwrap();

        assert_eq!(load_config(temp_dir.path()), SyncConfig::default());
    }

    #[test]
    fn incomplete_resource_entry_keeps_disabled_refresh() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            config_path(temp_dir.path()),
            r#"{"refresh":{"enabled":false},"resources":[{"name":"config","kind":"json","sources":[]}]}"#,
        )
        .unwrap();

        let config = load_config(temp_dir.path());

        assert!(!config.refresh.enabled);
        assert!(config.resources.is_empty());
    }

    #[test]
    fn malformed_resource_entries_are_skipped_individually() {
        let result = serde_json::from_value::<SyncConfig>(json!({
            "resources": [
                { "name": "broken", "kind": "xml" },
                {
                    "name": "panel",
                    "kind": "html",
                    "sources": ["https://a.example/p.html"],
                    "contentFile": "p.html",
                    "versionFile": "p.version"
                }
            ]
        }))
        .unwrap();

        assert_eq!(result.resources.len(), 1);
        assert_eq!(result.resources[0].name, "panel");
        assert!(result.refresh.enabled);
    }

    #[test]
    fn resources_that_are_not_an_array_fall_back_to_defaults() {
        let result = serde_json::from_value::<SyncConfig>(json!({
            "refresh": { "enabled": false },
            "resources": { "name": "config" }
        }))
        .unwrap();

        assert!(!result.refresh.enabled);
        assert!(result.resources.is_empty());
    }

    #[test]
    fn load_config_reads_file_from_plugin_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            config_path(temp_dir.path()),
            r#"{"refresh": {"enabled": false}}"#,
        )
        .unwrap();

        let config = load_config(temp_dir.path());

        assert!(!config.refresh.enabled);
        assert_eq!(config.refresh.timeout_secs, FETCH_TIMEOUT_SECS);
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/linkba-sync"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/linkba-sync"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./linkba-sync"));
    }
}
