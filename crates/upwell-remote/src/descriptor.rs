use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response of the update-distribution API describing the latest published
/// version of a plugin.
///
/// Identity fields default to empty strings so a thin response can still be
/// decoded and rejected explicitly via [`RemoteDescriptor::has_identity`].
/// The structure serializes back to JSON unchanged; that serialization is
/// also the cache record format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub tested: Option<String>,
    #[serde(default)]
    pub requires: Option<String>,
    #[serde(default, rename = "requires_php")]
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
    pub sections: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub banners: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub icons: Option<BTreeMap<String, String>>,
}

impl RemoteDescriptor {
    /// A descriptor without a slug and a version cannot drive an update
    /// decision.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        !self.slug.is_empty() && !self.version.is_empty()
    }
}
