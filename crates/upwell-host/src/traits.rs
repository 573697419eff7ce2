use async_trait::async_trait;
use std::time::Duration;

use crate::error::CacheError;
use crate::types::{
    CatalogEntry, CatalogQuery, EnvironmentFacts, PluginMetadata, UpdateCompleted, UpdateDirective,
};

/// Key/expiry store the host provides for cached update descriptors.
///
/// Values are opaque strings; the resolver serializes descriptors itself.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Read-only view of the host application the resolver runs inside.
pub trait HostEnvironment: Send + Sync {
    /// Best-effort guess of the host's own public URL, sent as the
    /// `referrer` query parameter.
    fn site_url(&self) -> Option<String>;

    /// Version of the installed plugin, read from its metadata. Best-effort.
    fn installed_plugin_version(&self, plugin_base: &str) -> Option<String>;

    fn facts(&self) -> EnvironmentFacts;
}

/// Callbacks the host's plugin-management dispatch delivers to registered
/// subscribers. Default implementations leave the dispatch result untouched
/// so a subscriber only has to implement the events it cares about.
#[async_trait]
pub trait UpdateSubscriber: Send + Sync {
    /// Called with the "already decided" slot for a plugin; a non-matching
    /// subscriber must return it unchanged.
    async fn check_update(
        &self,
        existing: Option<UpdateDirective>,
        plugin_file: &str,
        installed: &PluginMetadata,
        locale: &str,
    ) -> Option<UpdateDirective> {
        let _ = (plugin_file, installed, locale);
        existing
    }

    /// Called when the host wants full plugin detail for a display.
    async fn plugin_information(
        &self,
        existing: Option<CatalogEntry>,
        action: &str,
        query: &CatalogQuery,
    ) -> Option<CatalogEntry> {
        let _ = (action, query);
        existing
    }

    /// Fire-and-forget notification after an update action completed.
    async fn update_completed(&self, event: &UpdateCompleted) {
        let _ = event;
    }
}
