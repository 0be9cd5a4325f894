//! Namespace-scoped view over a KvStore.

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{Entry, KvStore};

/// A view of `S` restricted to keys beginning with a fixed prefix.
///
/// Callers address entries by suffix; the prefix is prepended on the way in
/// and stripped on the way out, so two views with disjoint prefixes never
/// observe each other's keys.
#[derive(Debug, Clone)]
pub struct PrefixStore<S> {
    inner: S,
    prefix: Vec<u8>,
}

impl<S: KvStore> PrefixStore<S> {
    /// Scope `inner` to `prefix`.
    pub fn new(inner: S, prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    /// The namespace prefix.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// The unscoped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// The full store key for `suffix`.
    pub fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.prefix.len() + suffix.len());
        key.extend_from_slice(&self.prefix);
        key.extend_from_slice(suffix);
        key
    }
}

#[async_trait]
impl<S: KvStore> KvStore for PrefixStore<S> {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.inner.get(&self.key(key)).await
    }

    async fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.inner.set(&self.key(key), value).await
    }

    async fn has(&self, key: &[u8]) -> Result<bool> {
        self.inner.has(&self.key(key)).await
    }

    async fn delete(&self, key: &[u8]) -> Result<()> {
        self.inner.delete(&self.key(key)).await
    }

    async fn scan_prefix(
        &self,
        prefix: &[u8],
        after: Option<&[u8]>,
        limit: usize,
    ) -> Result<Vec<Entry>> {
        let full_prefix = self.key(prefix);
        let full_after = after.map(|a| self.key(a));
        let entries = self
            .inner
            .scan_prefix(&full_prefix, full_after.as_deref(), limit)
            .await?;

        let strip = self.prefix.len();
        Ok(entries
            .into_iter()
            .map(|(mut key, value)| (key.split_off(strip), value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::traits::{conformance, StoreExt};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_prefix_store_conformance() {
        conformance::get_set_has_delete(&PrefixStore::new(MemoryStore::new(), "ns/")).await;
        conformance::prefix_scan_is_scoped_and_ordered(&PrefixStore::new(
            MemoryStore::new(),
            "ns/",
        ))
        .await;
        conformance::prefix_scan_paginates(&PrefixStore::new(MemoryStore::new(), "ns/")).await;
    }

    #[tokio::test]
    async fn test_keys_are_namespaced() {
        let raw = Arc::new(MemoryStore::new());
        let beams = PrefixStore::new(raw.clone(), "Beam/value/");
        let other = PrefixStore::new(raw.clone(), "Other/");

        beams.set(b"abc", b"1").await.unwrap();
        other.set(b"abc", b"2").await.unwrap();

        assert_eq!(raw.get(b"Beam/value/abc").await.unwrap(), Some(b"1".to_vec()));
        assert_eq!(beams.get(b"abc").await.unwrap(), Some(b"1".to_vec()));

        let listed = beams.scan_prefix_all(b"", 10).await.unwrap();
        assert_eq!(listed, vec![(b"abc".to_vec(), b"1".to_vec())]);
    }
}
