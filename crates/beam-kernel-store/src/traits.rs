//! KvStore trait: the abstract interface over a sorted key-value store.
//!
//! Keys and values are opaque bytes. Keys sort by raw byte order, which is
//! what makes prefix iteration well defined across backends.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// A stored `(key, value)` pair.
pub type Entry = (Vec<u8>, Vec<u8>);

/// A reasonable `page_size` for [`StoreExt::scan_prefix_all`].
pub const DEFAULT_PAGE_SIZE: usize = 256;

/// Async interface over a sorted key-value store.
///
/// All methods are async so blocking backends can run on
/// `tokio::task::spawn_blocking`. Each mutation is a single atomic put or
/// delete; there are no multi-key transactions.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Get the value stored under `key`.
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Check whether `key` is present.
    async fn has(&self, key: &[u8]) -> Result<bool>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &[u8]) -> Result<()>;

    /// Scan keys starting with `prefix`, in ascending byte order.
    ///
    /// Returns at most `limit` entries whose key is strictly greater than
    /// `after` when given. Passing the last key of one page as `after`
    /// resumes the scan.
    async fn scan_prefix(
        &self,
        prefix: &[u8],
        after: Option<&[u8]>,
        limit: usize,
    ) -> Result<Vec<Entry>>;
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn has(&self, key: &[u8]) -> Result<bool> {
        (**self).has(key).await
    }

    async fn delete(&self, key: &[u8]) -> Result<()> {
        (**self).delete(key).await
    }

    async fn scan_prefix(
        &self,
        prefix: &[u8],
        after: Option<&[u8]>,
        limit: usize,
    ) -> Result<Vec<Entry>> {
        (**self).scan_prefix(prefix, after, limit).await
    }
}

/// Extension trait for common store patterns.
pub trait StoreExt: KvStore {
    /// Collect every entry under `prefix`, fetching `page_size` at a time.
    fn scan_prefix_all(
        &self,
        prefix: &[u8],
        page_size: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Entry>>> + Send;
}

impl<S: KvStore + ?Sized> StoreExt for S {
    async fn scan_prefix_all(&self, prefix: &[u8], page_size: usize) -> Result<Vec<Entry>> {
        let page_size = page_size.max(1);
        let mut entries = Vec::new();
        let mut after: Option<Vec<u8>> = None;

        loop {
            let page = self.scan_prefix(prefix, after.as_deref(), page_size).await?;
            let exhausted = page.len() < page_size;
            if let Some((last, _)) = page.last() {
                after = Some(last.clone());
            }
            entries.extend(page);
            if exhausted {
                return Ok(entries);
            }
        }
    }
}

/// The smallest key greater than every key starting with `prefix`.
///
/// `None` means the range is unbounded above (empty or all-`0xff` prefix).
pub fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut upper = prefix.to_vec();
    while let Some(last) = upper.pop() {
        if last < u8::MAX {
            upper.push(last + 1);
            return Some(upper);
        }
    }
    None
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_successor() {
        assert_eq!(prefix_successor(b"abc"), Some(b"abd".to_vec()));
        assert_eq!(prefix_successor(b"ab\xff"), Some(b"ac".to_vec()));
        assert_eq!(prefix_successor(b"\xff\xff"), None);
        assert_eq!(prefix_successor(b""), None);
    }
}
