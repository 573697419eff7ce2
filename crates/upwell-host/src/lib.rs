mod error;
mod memory;
mod registry;
mod traits;
mod types;

pub use error::CacheError;
pub use memory::MemoryCache;
pub use registry::{
    CHECK_UPDATE, EventRegistry, PLUGIN_INFORMATION, UPDATE_COMPLETED, check_update_event,
};
pub use traits::{CacheStore, HostEnvironment, UpdateSubscriber};
pub use types::{
    CatalogEntry, CatalogQuery, CompletedAction, EnvironmentFacts, PluginIdentity, PluginMetadata,
    UpdateCompleted, UpdateDirective,
};
