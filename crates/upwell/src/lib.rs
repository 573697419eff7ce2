//! Update resolution for plugins distributed outside the host application's
//! own catalog.
//!
//! A resolver is configured once per plugin, registered with the host's
//! event registry, and from then on answers the host's update-check,
//! plugin-information, and completion callbacks by querying the configured
//! update-distribution API, with an optional 24-hour descriptor cache.

mod config;
mod resolver;
mod subscriber;

pub use config::{ConfigurationError, ResolverConfig, ResolverConfigBuilder};
pub use resolver::{DESCRIPTOR_TTL, UpdateResolver};
