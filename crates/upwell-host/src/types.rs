use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Identity of a plugin inside the host application, derived from the path
/// of its main file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginIdentity {
    /// Relative path of the main file, at most one directory deep
    /// (for example `my-plugin/my-plugin.php`).
    pub base: String,
    /// The containing directory name; the file stem for single-file plugins.
    pub slug: String,
}

impl PluginIdentity {
    #[must_use]
    pub fn from_file_path(path: &str) -> Self {
        let full = Path::new(path);
        let file = full.file_name().and_then(|name| name.to_str()).unwrap_or(path);
        let dir = full
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty());

        match dir {
            Some(dir) => Self {
                base: format!("{dir}/{file}"),
                slug: dir.to_string(),
            },
            None => {
                let stem = Path::new(file)
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or(file);
                Self {
                    base: file.to_string(),
                    slug: stem.to_string(),
                }
            }
        }
    }

    /// Key under which the resolver stores the cached remote descriptor.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("update-descriptor/{}", self.slug)
    }
}

/// Anonymous host environment data included in update queries when telemetry
/// is enabled. Absent facts are omitted from the serialized blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentFacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_upload_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// What the host knows about an installed plugin when it asks for an update
/// check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Arguments of a rich plugin-information request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub slug: Option<String>,
    pub locale: Option<String>,
}

/// The reduced install directive handed to the host's update machinery when
/// a newer version is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDirective {
    pub slug: String,
    /// Base path of the plugin the directive applies to.
    pub plugin: String,
    pub new_version: String,
    /// Download URL of the new package.
    pub package: String,
    #[serde(default)]
    pub tested: Option<String>,
    #[serde(default)]
    pub requires: Option<String>,
    #[serde(default)]
    pub requires_runtime: Option<String>,
    #[serde(default)]
    pub icons: BTreeMap<String, String>,
    #[serde(default)]
    pub banners: BTreeMap<String, String>,
}

/// Full plugin descriptor for a details/changelog display. Optional maps are
/// normalized to empty, never null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub slug: String,
    pub version: String,
    #[serde(default)]
    pub tested: Option<String>,
    #[serde(default)]
    pub requires: Option<String>,
    #[serde(default)]
    pub requires_runtime: Option<String>,
    #[serde(default)]
    pub requires_plugins: Vec<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_profile: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub sections: BTreeMap<String, String>,
    #[serde(default)]
    pub banners: BTreeMap<String, String>,
    #[serde(default)]
    pub icons: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletedAction {
    PluginInstall,
    PluginUpdate,
    Other,
}

/// Fire-and-forget notification the host emits after an update action
/// finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCompleted {
    pub action: CompletedAction,
    /// Base paths of the plugins the action touched.
    pub affected: Vec<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl UpdateCompleted {
    /// True when this event reports a completed update of the given plugin.
    #[must_use]
    pub fn is_plugin_update_of(&self, plugin_base: &str) -> bool {
        self.action == CompletedAction::PluginUpdate
            && self.affected.iter().any(|base| base == plugin_base)
    }
}
