use async_trait::async_trait;

use upwell_host::{
    CatalogEntry, CatalogQuery, PluginMetadata, UpdateCompleted, UpdateDirective, UpdateSubscriber,
};

use crate::resolver::UpdateResolver;

/// Glue between the host's dispatch and the resolver operations. The
/// update check matches on the plugin file identifier; the information
/// lookup matches on the slug.
#[async_trait]
impl UpdateSubscriber for UpdateResolver {
    async fn check_update(
        &self,
        existing: Option<UpdateDirective>,
        plugin_file: &str,
        installed: &PluginMetadata,
        _locale: &str,
    ) -> Option<UpdateDirective> {
        if existing.is_some() {
            // Another subscriber already decided for this plugin.
            return existing;
        }
        if plugin_file != self.identity().base {
            return existing;
        }

        let current = installed
            .version
            .clone()
            .unwrap_or_else(|| self.current_version().to_string());
        self.resolve_update(&self.identity().slug, &current).await
    }

    async fn plugin_information(
        &self,
        existing: Option<CatalogEntry>,
        action: &str,
        query: &CatalogQuery,
    ) -> Option<CatalogEntry> {
        self.describe_for_catalog(existing, action, query).await
    }

    async fn update_completed(&self, event: &UpdateCompleted) {
        self.purge_cache_on_completion(event).await;
    }
}
