use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::preview::PreviewContext;

/// Rendered pages, expiring after a fixed time.
///
/// Keys carry the revision namespace. Preview requests have no namespace and
/// never reach the cache, so a draft can't be served as the published page.
pub struct ContentCache<T> {
    cache: Option<RwLock<CacheMap<T>>>,
}

type CacheMap<T> = HashMap<String, CacheValue<T>>;

struct CacheValue<T> {
    expire_date: DateTime<Utc>,
    value: Arc<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn home(pages: u32, preview: &PreviewContext) -> Option<CacheKey> {
        preview.cache_namespace()
            .map(|ns| CacheKey(format!("{}/home/{}", ns, pages)))
    }

    pub fn post(slug: &str, preview: &PreviewContext) -> Option<CacheKey> {
        preview.cache_namespace()
            .map(|ns| CacheKey(format!("{}/post/{}", ns, slug)))
    }
}

impl<T> ContentCache<T> {
    pub fn new() -> Self {
        ContentCache {
            cache: Some(RwLock::new(HashMap::new())),
        }
    }

    pub fn non_caching() -> Self {
        ContentCache {
            cache: None,
        }
    }

    /// Stores `content` for `ttl`. Nothing is stored when the expiry date
    /// can't be represented.
    pub fn add(&self, key: &CacheKey, content: T, ttl: Duration) -> Arc<T> {
        let value = Arc::new(content);
        if let Some(ref cache) = self.cache {
            let Some(expire_date) = Utc::now().checked_add_signed(ttl) else {
                return value;
            };

            let mut cache = cache.write().unwrap_or_else(PoisonError::into_inner);
            cache.insert(key.0.clone(), CacheValue {
                expire_date,
                value: value.clone(),
            });
        }
        value
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<T>> {
        let cache = self.cache.as_ref()?;
        let reader = cache.read().unwrap_or_else(PoisonError::into_inner);
        let cache_value = reader.get(&key.0)?;
        if Utc::now() > cache_value.expire_date {
            return None;
        }
        Some(cache_value.value.clone())
    }

    /// Drops every expired entry.
    pub fn purge_expired(&self) -> usize {
        let Some(ref cache) = self.cache else {
            return 0;
        };
        let mut cache = cache.write().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now();
        let before = cache.len();
        cache.retain(|_, v| v.expire_date >= now);
        before - cache.len()
    }
}

impl<T> Default for ContentCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
