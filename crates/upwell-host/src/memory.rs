use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::error::CacheError;
use crate::traits::CacheStore;

struct Slot {
    value: String,
    expires_at: Instant,
}

/// In-memory [`CacheStore`] backed by a mutex-guarded map.
///
/// Intended for hosts without a persistent key/expiry store and for tests.
/// Expired entries are pruned lazily on read.
#[derive(Default)]
pub struct MemoryCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut slots = self.lock();
        let now = Instant::now();

        if matches!(slots.get(key), Some(slot) if slot.expires_at <= now) {
            slots.remove(key);
            return Ok(None);
        }

        Ok(slots.get(key).map(|slot| slot.value.clone()))
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.lock().insert(
            key.to_string(),
            Slot {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.lock().remove(key);
        Ok(())
    }
}
