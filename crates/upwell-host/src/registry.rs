use std::collections::HashMap;
use std::sync::Arc;

use crate::traits::UpdateSubscriber;
use crate::types::{CatalogEntry, CatalogQuery, PluginMetadata, UpdateCompleted, UpdateDirective};

pub const CHECK_UPDATE: &str = "check_update";
pub const PLUGIN_INFORMATION: &str = "plugin_information";
pub const UPDATE_COMPLETED: &str = "update_completed";

/// Name of the update-check event, namespaced per host when one is
/// configured so that several hosts sharing a registry stay apart.
#[must_use]
pub fn check_update_event(hostname: Option<&str>) -> String {
    hostname.map_or_else(
        || CHECK_UPDATE.to_string(),
        |host| format!("{host}/{CHECK_UPDATE}"),
    )
}

/// Maps event names to subscriber lists and dispatches host callbacks to
/// them in registration order.
///
/// The "already decided" slot of a check or information event is folded
/// through every subscriber; each one either claims it or returns it
/// unchanged.
#[derive(Default)]
pub struct EventRegistry {
    subscribers: HashMap<String, Vec<Arc<dyn UpdateSubscriber>>>,
}

impl EventRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, event: &str, subscriber: Arc<dyn UpdateSubscriber>) {
        self.subscribers
            .entry(event.to_string())
            .or_default()
            .push(subscriber);
    }

    #[must_use]
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers.get(event).map_or(0, Vec::len)
    }

    pub async fn dispatch_check_update(
        &self,
        event: &str,
        mut directive: Option<UpdateDirective>,
        plugin_file: &str,
        installed: &PluginMetadata,
        locale: &str,
    ) -> Option<UpdateDirective> {
        if let Some(subscribers) = self.subscribers.get(event) {
            for subscriber in subscribers {
                directive = subscriber
                    .check_update(directive, plugin_file, installed, locale)
                    .await;
            }
        }
        directive
    }

    pub async fn dispatch_plugin_information(
        &self,
        mut entry: Option<CatalogEntry>,
        action: &str,
        query: &CatalogQuery,
    ) -> Option<CatalogEntry> {
        if let Some(subscribers) = self.subscribers.get(PLUGIN_INFORMATION) {
            for subscriber in subscribers {
                entry = subscriber.plugin_information(entry, action, query).await;
            }
        }
        entry
    }

    pub async fn dispatch_update_completed(&self, event: &UpdateCompleted) {
        if let Some(subscribers) = self.subscribers.get(UPDATE_COMPLETED) {
            for subscriber in subscribers {
                subscriber.update_completed(event).await;
            }
        }
    }
}
