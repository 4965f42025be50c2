//! Word list caching using moka
//!
//! Dictionary resolution can be expensive (imports, remote stores), and the
//! same dictionary is often referenced by many terms. Misses are cached too,
//! so a dictionary that does not exist is not looked up again until expiry.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use super::WordListProvider;
use crate::config::WordListCacheConfig;
use crate::expression::DocRef;

/// Caching wrapper around any [`WordListProvider`], keyed by dictionary uuid
pub struct CachedWordListProvider<P> {
    inner: P,
    cache: Cache<String, Option<Arc<Vec<String>>>>,
}

impl<P: WordListProvider> CachedWordListProvider<P> {
    pub fn new(inner: P, config: &WordListCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .build();

        tracing::debug!(
            max_entries = config.max_entries,
            ttl_secs = config.ttl_secs,
            "Word list cache initialized"
        );

        Self { inner, cache }
    }

    /// Drop the cached entry of one dictionary
    pub fn invalidate(&self, dictionary: &DocRef) {
        if let Some(uuid) = &dictionary.uuid {
            self.cache.invalidate(uuid);
        }
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: WordListProvider> WordListProvider for CachedWordListProvider<P> {
    fn words(&self, dictionary: &DocRef) -> Option<Vec<String>> {
        let Some(uuid) = &dictionary.uuid else {
            return self.inner.words(dictionary);
        };
        self.cache
            .get_with(uuid.clone(), || self.inner.words(dictionary).map(Arc::new))
            .map(|words| words.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl WordListProvider for CountingProvider {
        fn words(&self, dictionary: &DocRef) -> Option<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match dictionary.uuid.as_deref() {
                Some("known") => Some(vec!["a".to_string(), "b".to_string()]),
                _ => None,
            }
        }
    }

    fn cached() -> CachedWordListProvider<CountingProvider> {
        CachedWordListProvider::new(
            CountingProvider {
                calls: AtomicUsize::new(0),
            },
            &WordListCacheConfig::default(),
        )
    }

    fn calls(provider: &CachedWordListProvider<CountingProvider>) -> usize {
        provider.inner().calls.load(Ordering::SeqCst)
    }

    #[test]
    fn test_hits_are_cached() {
        let provider = cached();
        let known = DocRef::new("Dictionary", "known");
        assert_eq!(provider.words(&known), Some(vec!["a".into(), "b".into()]));
        assert_eq!(provider.words(&known), Some(vec!["a".into(), "b".into()]));
        assert_eq!(calls(&provider), 1);
    }

    #[test]
    fn test_misses_are_cached() {
        let provider = cached();
        let unknown = DocRef::new("Dictionary", "unknown");
        assert_eq!(provider.words(&unknown), None);
        assert_eq!(provider.words(&unknown), None);
        assert_eq!(calls(&provider), 1);
    }

    #[test]
    fn test_invalidate() {
        let provider = cached();
        let known = DocRef::new("Dictionary", "known");
        provider.words(&known);
        provider.invalidate(&known);
        provider.words(&known);
        assert_eq!(calls(&provider), 2);
    }

    #[test]
    fn test_no_uuid_bypasses_cache() {
        let provider = cached();
        let empty = DocRef::empty("Dictionary");
        provider.words(&empty);
        provider.words(&empty);
        assert_eq!(calls(&provider), 2);
    }
}
