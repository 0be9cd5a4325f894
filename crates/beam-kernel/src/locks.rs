//! Striped per-beam locks.
//!
//! Every read-modify-write of a beam runs under the stripe its id hashes to.
//! Distinct ids may share a stripe; that only costs throughput.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use beam_kernel_core::BeamId;
use tokio::sync::{Mutex, MutexGuard};

pub(crate) struct LockTable {
    stripes: Box<[Mutex<()>]>,
}

impl LockTable {
    pub(crate) fn new(stripes: usize) -> Self {
        Self {
            stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Wait for exclusive access to `id`.
    pub(crate) async fn lock(&self, id: &BeamId) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe(id)].lock().await
    }

    fn stripe(&self, id: &BeamId) -> usize {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }
}
