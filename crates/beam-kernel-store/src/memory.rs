//! In-memory implementation of the KvStore trait.
//!
//! This is primarily for testing. It has the same ordering semantics as
//! SQLite but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::traits::{Entry, KvStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.write()?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    async fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.read()?.contains_key(key))
    }

    async fn delete(&self, key: &[u8]) -> Result<()> {
        self.write()?.remove(key);
        Ok(())
    }

    async fn scan_prefix(
        &self,
        prefix: &[u8],
        after: Option<&[u8]>,
        limit: usize,
    ) -> Result<Vec<Entry>> {
        let start = match after {
            Some(after) if after >= prefix => Bound::Excluded(after.to_vec()),
            _ => Bound::Included(prefix.to_vec()),
        };

        let inner = self.read()?;
        Ok(inner
            .range((start, Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix))
            .take(limit)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::conformance;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_get_set_has_delete() {
        conformance::get_set_has_delete(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_prefix_scan_is_scoped_and_ordered() {
        conformance::prefix_scan_is_scoped_and_ordered(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_prefix_scan_paginates() {
        conformance::prefix_scan_paginates(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_empty_prefix_scans_everything() {
        conformance::empty_prefix_scans_everything(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_len() {
        let store = MemoryStore::new();
        assert!(store.is_empty().unwrap());
        store.set(b"a", b"1").await.unwrap();
        store.set(b"a", b"2").await.unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    proptest! {
        #[test]
        fn scan_matches_filtered_keys(
            keys in proptest::collection::btree_set(proptest::collection::vec(0u8..4, 0..4), 0..32),
            prefix in proptest::collection::vec(0u8..4, 0..2),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let store = MemoryStore::new();

            let scanned = rt.block_on(async {
                for key in &keys {
                    store.set(key, b"").await.unwrap();
                }
                let mut scanned = Vec::new();
                let mut after: Option<Vec<u8>> = None;
                loop {
                    let page = store.scan_prefix(&prefix, after.as_deref(), 3).await.unwrap();
                    if page.is_empty() {
                        break;
                    }
                    after = page.last().map(|(k, _)| k.clone());
                    scanned.extend(page.into_iter().map(|(k, _)| k));
                }
                scanned
            });

            let expected: Vec<Vec<u8>> = keys
                .iter()
                .filter(|k| k.starts_with(&prefix))
                .cloned()
                .collect();
            prop_assert_eq!(scanned, expected);
        }
    }
}
