use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use upwell_host::{
    CacheStore, CatalogEntry, CatalogQuery, EventRegistry, HostEnvironment, PLUGIN_INFORMATION,
    PluginIdentity, UPDATE_COMPLETED, UpdateCompleted, UpdateDirective, UpdateSubscriber,
    check_update_event,
};
use upwell_remote::{DescriptorSource, FetchRequest, HttpSource, RemoteDescriptor, is_newer};

use crate::config::ResolverConfig;

/// Cached descriptors stay valid for a day before a check goes live again.
pub const DESCRIPTOR_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Decides whether a newer version of one configured plugin exists, caching
/// the remote descriptor through the host's [`CacheStore`].
pub struct UpdateResolver {
    config: ResolverConfig,
    identity: PluginIdentity,
    current_version: String,
    source: Arc<dyn DescriptorSource>,
    cache: Arc<dyn CacheStore>,
    env: Arc<dyn HostEnvironment>,
}

impl UpdateResolver {
    #[must_use]
    pub fn new(
        config: ResolverConfig,
        env: Arc<dyn HostEnvironment>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self::with_source(config, env, cache, Arc::new(HttpSource::default()))
    }

    /// Construct with an explicit descriptor source instead of the HTTP one.
    #[must_use]
    pub fn with_source(
        config: ResolverConfig,
        env: Arc<dyn HostEnvironment>,
        cache: Arc<dyn CacheStore>,
        source: Arc<dyn DescriptorSource>,
    ) -> Self {
        let identity = config.identity();
        // Best-effort: a plugin whose installed version cannot be read still
        // gets update checks, with every remote version counting as newer.
        let current_version = config
            .current_version
            .clone()
            .or_else(|| env.installed_plugin_version(&identity.base))
            .unwrap_or_default();
        if current_version.is_empty() {
            debug!("installed version of {} unknown", identity.base);
        }

        Self {
            config,
            identity,
            current_version,
            source,
            cache,
            env,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &PluginIdentity {
        &self.identity
    }

    #[must_use]
    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// Event the resolver's update check listens on, namespaced by the
    /// configured hostname.
    #[must_use]
    pub fn check_event(&self) -> String {
        check_update_event(self.config.hostname.as_deref())
    }

    /// Subscribe this resolver once to its three host events.
    pub fn register(self: Arc<Self>, registry: &mut EventRegistry) {
        registry.subscribe(
            &self.check_event(),
            Arc::clone(&self) as Arc<dyn UpdateSubscriber>,
        );
        registry.subscribe(
            PLUGIN_INFORMATION,
            Arc::clone(&self) as Arc<dyn UpdateSubscriber>,
        );
        registry.subscribe(UPDATE_COMPLETED, self as Arc<dyn UpdateSubscriber>);
    }

    /// Decide whether a newer version of the configured plugin exists.
    ///
    /// Calls for a foreign slug decide nothing; the subscriber layer keeps
    /// the host's dispatch slot untouched in that case. Remote failures
    /// degrade to `None` so an unreachable update service never breaks the
    /// host's update flow. At most one outbound call per invocation, zero on
    /// a fresh cache entry.
    pub async fn resolve_update(
        &self,
        for_slug: &str,
        current_version: &str,
    ) -> Option<UpdateDirective> {
        if for_slug != self.identity.slug {
            return None;
        }

        let descriptor = self.descriptor().await?;
        evaluate(&descriptor, &self.identity, current_version)
    }

    /// Rich plugin detail for a details/changelog display.
    ///
    /// Acts only on `plugin_information` queries for this plugin's slug;
    /// every other query, and any remote failure, passes `existing` through
    /// unchanged.
    pub async fn describe_for_catalog(
        &self,
        existing: Option<CatalogEntry>,
        action: &str,
        query: &CatalogQuery,
    ) -> Option<CatalogEntry> {
        if action != PLUGIN_INFORMATION {
            return existing;
        }
        if query.slug.as_deref() != Some(self.identity.slug.as_str()) {
            return existing;
        }

        match self.descriptor().await {
            Some(descriptor) => Some(catalog_entry(descriptor)),
            None => existing,
        }
    }

    /// Drop the cached descriptor once the host reports this plugin was
    /// updated, forcing the next check live. The only invalidation trigger
    /// besides TTL expiry.
    pub async fn purge_cache_on_completion(&self, event: &UpdateCompleted) {
        if !self.config.use_cache || !event.is_plugin_update_of(&self.identity.base) {
            return;
        }

        let key = self.identity.cache_key();
        match self.cache.delete(&key).await {
            Ok(()) => debug!("purged {key} after completed update"),
            Err(error) => warn!("failed to purge {key}: {error}"),
        }
    }

    /// Cache-or-fetch. Every failure on this path is logged and degrades to
    /// `None`; an undecodable cache entry counts as a miss.
    async fn descriptor(&self) -> Option<RemoteDescriptor> {
        let key = self.identity.cache_key();

        if self.config.use_cache {
            match self.cache.get(&key).await {
                Ok(Some(record)) => match serde_json::from_str::<RemoteDescriptor>(&record) {
                    Ok(descriptor) => {
                        debug!("using cached descriptor for {}", self.identity.slug);
                        return Some(descriptor);
                    }
                    Err(error) => {
                        warn!("cached descriptor {key} is undecodable, refetching: {error}");
                    }
                },
                Ok(None) => {}
                Err(error) => warn!("cache read for {key} failed, fetching live: {error}"),
            }
        }

        let request = self.build_request();
        let descriptor = match self.source.fetch(&request).await {
            Ok(descriptor) => descriptor,
            Err(error) => {
                warn!("update check for {} failed: {error}", self.identity.slug);
                return None;
            }
        };

        if self.config.use_cache {
            match serde_json::to_string(&descriptor) {
                Ok(record) => {
                    if let Err(error) = self.cache.put(&key, record, DESCRIPTOR_TTL).await {
                        warn!("cache write for {key} failed: {error}");
                    }
                }
                Err(error) => warn!("descriptor for {key} did not serialize: {error}"),
            }
        }

        Some(descriptor)
    }

    fn build_request(&self) -> FetchRequest {
        FetchRequest {
            endpoint: self.config.api_base_url.clone(),
            plugin_id: self.config.plugin_id.clone(),
            slug: self.identity.slug.clone(),
            installed_version: self.current_version.clone(),
            referrer: self.env.site_url(),
            secret: self.config.secret.clone(),
            telemetry: self.telemetry_payload(),
        }
    }

    fn telemetry_payload(&self) -> serde_json::Value {
        if !self.config.telemetry_enabled {
            return serde_json::Value::Object(serde_json::Map::new());
        }
        serde_json::to_value(self.env.facts())
            .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()))
    }
}

/// Pure update decision: the remote version must be strictly newer, and the
/// descriptor must carry identity.
fn evaluate(
    descriptor: &RemoteDescriptor,
    identity: &PluginIdentity,
    current_version: &str,
) -> Option<UpdateDirective> {
    if !descriptor.has_identity() {
        warn!(
            "descriptor for {} lacks slug or version, treating as no update",
            identity.slug
        );
        return None;
    }
    if !is_newer(&descriptor.version, current_version) {
        return None;
    }

    info!(
        "update {current_version} -> {} available for {}",
        descriptor.version, identity.slug
    );
    Some(UpdateDirective {
        slug: descriptor.slug.clone(),
        plugin: identity.base.clone(),
        new_version: descriptor.version.clone(),
        package: descriptor.download_url.clone().unwrap_or_default(),
        tested: descriptor.tested.clone(),
        requires: descriptor.requires.clone(),
        requires_runtime: descriptor.requires_runtime.clone(),
        icons: descriptor.icons.clone().unwrap_or_default(),
        banners: descriptor.banners.clone().unwrap_or_default(),
    })
}

/// Full catalog shape with the optional maps normalized to empty.
fn catalog_entry(descriptor: RemoteDescriptor) -> CatalogEntry {
    CatalogEntry {
        name: descriptor.name,
        slug: descriptor.slug,
        version: descriptor.version,
        tested: descriptor.tested,
        requires: descriptor.requires,
        requires_runtime: descriptor.requires_runtime,
        requires_plugins: descriptor.requires_plugins,
        author: descriptor.author,
        author_profile: descriptor.author_profile,
        download_url: descriptor.download_url,
        last_updated: descriptor.last_updated,
        sections: descriptor.sections.unwrap_or_default(),
        banners: descriptor.banners.unwrap_or_default(),
        icons: descriptor.icons.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use upwell_host::{EnvironmentFacts, MemoryCache};

    use super::*;
    use crate::config::ResolverConfig;

    struct StubEnv;

    impl HostEnvironment for StubEnv {
        fn site_url(&self) -> Option<String> {
            Some("https://blog.example.org".to_string())
        }

        fn installed_plugin_version(&self, _plugin_base: &str) -> Option<String> {
            Some("1.1.0".to_string())
        }

        fn facts(&self) -> EnvironmentFacts {
            EnvironmentFacts {
                platform_version: Some("6.4.1".to_string()),
                runtime_version: Some("8.2.7".to_string()),
                max_upload_size: Some(64 * 1024 * 1024),
                timezone: Some("Europe/Lisbon".to_string()),
                locale: Some("en_US".to_string()),
            }
        }
    }

    fn identity() -> PluginIdentity {
        PluginIdentity::from_file_path("my-plugin/my-plugin.php")
    }

    fn descriptor(version: &str) -> RemoteDescriptor {
        RemoteDescriptor {
            name: "My Plugin".to_string(),
            slug: "my-plugin".to_string(),
            version: version.to_string(),
            download_url: Some("https://updates.example.com/my-plugin.zip".to_string()),
            ..RemoteDescriptor::default()
        }
    }

    fn resolver(config: ResolverConfig) -> UpdateResolver {
        UpdateResolver::new(config, Arc::new(StubEnv), Arc::new(MemoryCache::new()))
    }

    fn base_config() -> crate::config::ResolverConfigBuilder {
        ResolverConfig::builder()
            .plugin_file_path("my-plugin/my-plugin.php")
            .api_base_url("https://updates.example.com/v1/check")
            .plugin_id("pl_1827")
    }

    #[test]
    fn evaluate_offers_strictly_newer_versions_only() {
        let update = evaluate(&descriptor("1.2.0"), &identity(), "1.0.0")
            .expect("newer remote version should produce a directive");

        assert_eq!(update.new_version, "1.2.0");
        assert_eq!(update.plugin, "my-plugin/my-plugin.php");
        assert_eq!(update.package, "https://updates.example.com/my-plugin.zip");

        assert!(evaluate(&descriptor("1.2.0"), &identity(), "1.2.0").is_none());
        assert!(evaluate(&descriptor("1.2.0"), &identity(), "2.0.0").is_none());
    }

    #[test]
    fn evaluate_rejects_descriptors_without_identity() {
        let mut incomplete = descriptor("1.2.0");
        incomplete.version = String::new();

        assert!(evaluate(&incomplete, &identity(), "1.0.0").is_none());
    }

    #[test]
    fn evaluate_normalizes_missing_maps_to_empty() {
        let update = evaluate(&descriptor("1.2.0"), &identity(), "1.0.0")
            .expect("newer remote version should produce a directive");

        assert!(update.icons.is_empty());
        assert!(update.banners.is_empty());
    }

    #[test]
    fn catalog_entry_normalizes_missing_maps_to_empty() {
        let entry = catalog_entry(descriptor("1.2.0"));

        assert_eq!(entry.name, "My Plugin");
        assert!(entry.sections.is_empty());
        assert!(entry.banners.is_empty());
        assert!(entry.icons.is_empty());
    }

    #[test]
    fn catalog_entry_keeps_present_maps() {
        let mut with_sections = descriptor("1.2.0");
        with_sections.sections = Some(BTreeMap::from([(
            "changelog".to_string(),
            "<p>Fixes.</p>".to_string(),
        )]));

        let entry = catalog_entry(with_sections);
        assert_eq!(
            entry.sections.get("changelog").map(String::as_str),
            Some("<p>Fixes.</p>")
        );
    }

    #[test]
    fn construction_resolves_version_from_installed_metadata() {
        let config = base_config().build().expect("valid config should build");

        let resolver = resolver(config);

        assert_eq!(resolver.current_version(), "1.1.0");
    }

    #[test]
    fn explicit_version_wins_over_installed_metadata() {
        let config = base_config()
            .current_version("0.9.0")
            .build()
            .expect("valid config should build");

        let resolver = resolver(config);

        assert_eq!(resolver.current_version(), "0.9.0");
    }

    #[test]
    fn check_event_is_namespaced_by_hostname() {
        let plain = resolver(base_config().build().expect("valid config should build"));
        assert_eq!(plain.check_event(), "check_update");

        let namespaced = resolver(
            base_config()
                .hostname("blog.example.org")
                .build()
                .expect("valid config should build"),
        );
        assert_eq!(namespaced.check_event(), "blog.example.org/check_update");
    }

    #[test]
    fn request_telemetry_is_empty_when_disabled() {
        let resolver = resolver(base_config().build().expect("valid config should build"));

        let request = resolver.build_request();

        assert_eq!(request.telemetry, serde_json::json!({}));
        assert_eq!(request.referrer.as_deref(), Some("https://blog.example.org"));
        assert!(request.secret.is_none());
    }

    #[test]
    fn request_carries_facts_and_secret_when_configured() {
        let resolver = resolver(
            base_config()
                .telemetry_enabled(true)
                .secret("s3cr3t")
                .build()
                .expect("valid config should build"),
        );

        let request = resolver.build_request();

        assert_eq!(request.telemetry["platform_version"], "6.4.1");
        assert_eq!(request.telemetry["locale"], "en_US");
        assert_eq!(request.secret.as_deref(), Some("s3cr3t"));
        assert_eq!(request.plugin_id, "pl_1827");
        assert_eq!(request.slug, "my-plugin");
    }
}
