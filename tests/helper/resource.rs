//! Tracked resource test utilities

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use linkba_sync::plugin::web_directory;
use linkba_sync::sync::{ResourceKind, TrackedResource};

/// A throwaway plugin directory with a `web` folder
pub struct TestPlugin {
    pub dir: TempDir,
}

impl TestPlugin {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn web_dir(&self) -> PathBuf {
        web_directory(self.dir.path())
    }

    /// Pre-populate a content file and its version marker
    pub fn seed(&self, resource: &TrackedResource, content: &str, version: &str) {
        std::fs::create_dir_all(resource.content_path.parent().unwrap()).unwrap();
        std::fs::write(&resource.content_path, content).unwrap();
        std::fs::write(&resource.version_path, version).unwrap();
    }

    /// Write the plugin configuration file
    pub fn write_config(&self, config: &serde_json::Value) {
        std::fs::write(
            self.dir.path().join("linkba.json"),
            serde_json::to_string(config).unwrap(),
        )
        .unwrap();
    }
}

pub fn json_resource(plugin: &TestPlugin, sources: Vec<String>) -> TrackedResource {
    TrackedResource::new(
        "config",
        ResourceKind::Json,
        sources,
        plugin.web_dir().join("config.json"),
        plugin.web_dir().join("config.version"),
    )
}

pub fn html_resource(plugin: &TestPlugin, sources: Vec<String>) -> TrackedResource {
    TrackedResource::new(
        "panel",
        ResourceKind::Html,
        sources,
        plugin.web_dir().join("linkba.html"),
        plugin.web_dir().join("linkba.html.version"),
    )
}

pub fn read(path: &Path) -> Option<Vec<u8>> {
    std::fs::read(path).ok()
}
