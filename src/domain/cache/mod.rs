//! TTL cache abstraction
//!
//! Values are stored JSON-serialized with a per-entry TTL. Reads past expiry
//! behave as a miss; implementations evict lazily on read.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::DomainError;

/// Trait for cache backends operating on raw serialized strings
#[async_trait]
pub trait Cache: Send + Sync + std::fmt::Debug {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    async fn delete(&self, key: &str) -> Result<bool, DomainError>;
}

/// Typed convenience layer over [`Cache`]
#[async_trait]
pub trait CacheExt: Cache {
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DomainError> {
        match self.get_raw(key).await? {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .map_err(|e| DomainError::cache(format!("Corrupt cache entry: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| DomainError::cache(format!("Failed to serialize value: {}", e)))?;
        self.set_raw(key, &raw, ttl).await
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}

/// Build a cache key from a namespace and an ordered tuple of parts.
///
/// Parts are joined in order, so the same parts in a different order produce
/// a different key.
pub fn cache_key(namespace: &str, parts: &[&str]) -> String {
    let mut key = String::from(namespace);
    for part in parts {
        key.push(':');
        key.push_str(part);
    }
    key
}
