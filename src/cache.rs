use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{future::Cache, Expiry};

use crate::error::Error;

/// Expiring key-value store holding serialized API responses.
///
/// Entries are a derived artifact of the canonical tables: callers treat
/// every error as a miss and fall back to the store.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error>;

    async fn set_with_ttl(
        &self,
        key: &str,
        payload: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), Error>;
}

/// A cache entry with its own time to live
#[derive(Clone)]
pub struct CachedResponse {
    pub payload: Vec<u8>,
    pub ttl: Duration,
}

struct ResponseExpiry;

impl Expiry<String, CachedResponse> for ResponseExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedResponse,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedResponse,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process expiring cache backed by moka
pub struct MokaCache {
    entries: Cache<String, CachedResponse>,
}

impl MokaCache {
    pub fn new(max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(ResponseExpiry)
            .build();

        Self { entries }
    }
}

#[async_trait]
impl KeyValueCache for MokaCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.entries.get(key).await.map(|entry| entry.payload))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        payload: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), Error> {
        self.entries
            .insert(key.to_owned(), CachedResponse { payload, ttl })
            .await;
        Ok(())
    }
}

impl std::fmt::Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
