use thiserror::Error;
use upwell_host::PluginIdentity;

/// Required setup fields were missing or empty at build time. Names every
/// offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing required configuration field(s): {}", .missing.join(", "))]
pub struct ConfigurationError {
    pub missing: Vec<&'static str>,
}

/// Immutable resolver configuration.
///
/// Built through [`ResolverConfig::builder`]; no resolver method is
/// reachable before validation has passed.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub plugin_file_path: String,
    pub api_base_url: String,
    /// Opaque identifier the distribution service assigned to the plugin.
    pub plugin_id: String,
    /// Installed version; resolved from plugin metadata when absent.
    pub current_version: Option<String>,
    pub use_cache: bool,
    /// Bearer token for authenticated update endpoints.
    pub secret: Option<String>,
    pub telemetry_enabled: bool,
    /// Namespaces the update-check event when several hosts share a
    /// registry.
    pub hostname: Option<String>,
}

impl ResolverConfig {
    #[must_use]
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    #[must_use]
    pub fn identity(&self) -> PluginIdentity {
        PluginIdentity::from_file_path(&self.plugin_file_path)
    }
}

#[derive(Debug, Clone)]
pub struct ResolverConfigBuilder {
    plugin_file_path: String,
    api_base_url: String,
    plugin_id: String,
    current_version: Option<String>,
    use_cache: bool,
    secret: Option<String>,
    telemetry_enabled: bool,
    hostname: Option<String>,
}

impl Default for ResolverConfigBuilder {
    fn default() -> Self {
        Self {
            plugin_file_path: String::new(),
            api_base_url: String::new(),
            plugin_id: String::new(),
            current_version: None,
            use_cache: true,
            secret: None,
            telemetry_enabled: false,
            hostname: None,
        }
    }
}

impl ResolverConfigBuilder {
    #[must_use]
    pub fn plugin_file_path(mut self, path: impl Into<String>) -> Self {
        self.plugin_file_path = path.into();
        self
    }

    #[must_use]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    #[must_use]
    pub fn plugin_id(mut self, id: impl Into<String>) -> Self {
        self.plugin_id = id.into();
        self
    }

    #[must_use]
    pub fn current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn use_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    #[must_use]
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    #[must_use]
    pub fn telemetry_enabled(mut self, enabled: bool) -> Self {
        self.telemetry_enabled = enabled;
        self
    }

    #[must_use]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// # Errors
    /// Fails when `plugin_file_path` or `api_base_url` is missing or empty,
    /// naming every missing field.
    pub fn build(self) -> Result<ResolverConfig, ConfigurationError> {
        let mut missing = Vec::new();
        if self.plugin_file_path.trim().is_empty() {
            missing.push("plugin_file_path");
        }
        if self.api_base_url.trim().is_empty() {
            missing.push("api_base_url");
        }
        if !missing.is_empty() {
            return Err(ConfigurationError { missing });
        }

        Ok(ResolverConfig {
            plugin_file_path: self.plugin_file_path,
            api_base_url: self.api_base_url,
            plugin_id: self.plugin_id,
            current_version: self.current_version,
            use_cache: self.use_cache,
            secret: self.secret,
            telemetry_enabled: self.telemetry_enabled,
            hostname: self.hostname,
        })
    }
}
