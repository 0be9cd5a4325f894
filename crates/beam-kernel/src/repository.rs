//! Beam repository: every store access for beams goes through here.
//!
//! Beams live under a fixed namespace prefix, keyed by id, one entry per
//! beam. There are no secondary indexes.

use beam_kernel_core::{canonical_bytes, check_page_limit, decode_beam, Beam, BeamId, CoreError};
use beam_kernel_store::{KvStore, PrefixStore, StoreExt, DEFAULT_PAGE_SIZE};
use tracing::debug;

use crate::error::{KernelError, Result};

/// Namespace prefix for beam records.
pub const BEAM_PREFIX: &[u8] = b"Beam/value/";

/// One page of a beam listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeamPage {
    /// Beams in ascending id order.
    pub beams: Vec<Beam>,
    /// Pass as `after` to fetch the next page; `None` when exhausted.
    pub next: Option<BeamId>,
}

/// Typed access to stored beams.
#[derive(Debug, Clone)]
pub struct BeamRepository<S> {
    store: PrefixStore<S>,
}

impl<S: KvStore> BeamRepository<S> {
    /// Wrap a store; beams are kept under [`BEAM_PREFIX`].
    pub fn new(store: S) -> Self {
        Self {
            store: PrefixStore::new(store, BEAM_PREFIX),
        }
    }

    /// The full store key of a beam.
    pub fn key(&self, id: &BeamId) -> Vec<u8> {
        self.store.key(id.as_bytes())
    }

    /// Load a beam, treating absence as data.
    pub async fn find(&self, id: &BeamId) -> Result<Option<Beam>> {
        match self.store.get(id.as_bytes()).await? {
            Some(bytes) => Ok(Some(decode_stored(id.as_bytes(), &bytes)?)),
            None => Ok(None),
        }
    }

    /// Load a beam, failing with `NotFound` when absent.
    pub async fn get(&self, id: &BeamId) -> Result<Beam> {
        self.find(id)
            .await?
            .ok_or_else(|| KernelError::NotFound(id.clone()))
    }

    /// Whether a beam is stored under `id`.
    pub async fn has(&self, id: &BeamId) -> Result<bool> {
        Ok(self.store.has(id.as_bytes()).await?)
    }

    /// Encode and store `beam`, overwriting any previous record.
    pub async fn upsert(&self, beam: &Beam) -> Result<()> {
        let bytes = canonical_bytes(beam);
        self.store.set(beam.id.as_bytes(), &bytes).await?;
        debug!(beam_id = %beam.id, status = %beam.status, len = bytes.len(), "stored beam");
        Ok(())
    }

    /// Up to `limit` beams with ids after `after`, in id order.
    ///
    /// `limit` must lie in `1..=MAX_PAGE_SIZE`.
    pub async fn list_page(&self, after: Option<&BeamId>, limit: usize) -> Result<BeamPage> {
        check_page_limit(limit)?;
        let entries = self
            .store
            .scan_prefix(b"", after.map(BeamId::as_bytes), limit)
            .await?;

        let full = entries.len() == limit;
        let beams = entries
            .iter()
            .map(|(key, bytes)| decode_stored(key, bytes))
            .collect::<Result<Vec<_>>>()?;

        let next = if full {
            beams.last().map(|b| b.id.clone())
        } else {
            None
        };
        Ok(BeamPage { beams, next })
    }

    /// Every beam, in id order.
    pub async fn list(&self) -> Result<Vec<Beam>> {
        self.store
            .scan_prefix_all(b"", DEFAULT_PAGE_SIZE)
            .await?
            .iter()
            .map(|(key, bytes)| decode_stored(key, bytes))
            .collect()
    }
}

/// Decode a record and check it sits under its own id.
fn decode_stored(key: &[u8], bytes: &[u8]) -> Result<Beam> {
    let beam = decode_beam(bytes)?;
    if beam.id.as_bytes() != key {
        return Err(KernelError::Decode(CoreError::Decoding(format!(
            "record stored under {:?} has id {}",
            String::from_utf8_lossy(key),
            beam.id
        ))));
    }
    Ok(beam)
}
