//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use beam_kernel::transfer::memory::InMemoryLedger;
use beam_kernel::{Kernel, KernelConfig};
use beam_kernel_core::{Actor, Amount, Beam, BeamId, IdGenerator, OpenBeam};
use beam_kernel_store::{MemoryStore, SqliteStore};
use tracing_subscriber::EnvFilter;

/// Kernel over shared in-memory storage and a shared ledger.
pub type MemoryKernel = Kernel<Arc<MemoryStore>, Arc<InMemoryLedger>>;

/// Kernel over SQLite and a shared ledger.
pub type SqliteKernel = Kernel<SqliteStore, Arc<InMemoryLedger>>;

/// Install a test-friendly tracing subscriber once per process.
///
/// Honours `RUST_LOG`; defaults to `warn`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub fn alice() -> Actor {
    Actor::new("alice")
}

pub fn bob() -> Actor {
    Actor::new("bob")
}

pub fn carol() -> Actor {
    Actor::new("carol")
}

/// A kernel with handles on its store and ledger.
pub struct KernelFixture {
    pub kernel: Arc<MemoryKernel>,
    pub store: Arc<MemoryStore>,
    pub ledger: Arc<InMemoryLedger>,
}

impl KernelFixture {
    /// Default configuration, permissive ledger.
    pub fn new() -> Self {
        Self::with_config(KernelConfig::default())
    }

    /// Custom configuration, permissive ledger.
    pub fn with_config(config: KernelConfig) -> Self {
        Self::build(config, InMemoryLedger::new(), None)
    }

    /// Custom ledger, e.g. a strict one.
    pub fn with_ledger(ledger: InMemoryLedger) -> Self {
        Self::build(KernelConfig::default(), ledger, None)
    }

    /// Custom identifier source.
    pub fn with_ids(config: KernelConfig, ids: impl IdGenerator + 'static) -> Self {
        Self::build(config, InMemoryLedger::new(), Some(Box::new(ids)))
    }

    fn build(
        config: KernelConfig,
        ledger: InMemoryLedger,
        ids: Option<Box<dyn IdGenerator>>,
    ) -> Self {
        init_tracing();
        let store = Arc::new(MemoryStore::new());
        let ledger = Arc::new(ledger);
        let mut kernel =
            Kernel::new(store.clone(), ledger.clone(), config).expect("valid test config");
        if let Some(ids) = ids {
            kernel = kernel.with_id_generator(BoxedIds(ids));
        }

        Self {
            kernel: Arc::new(kernel),
            store,
            ledger,
        }
    }

    /// Open a beam, panicking on failure.
    pub async fn open_beam(&self, creator: Actor, secret: &str, amount: u64) -> BeamId {
        self.kernel
            .open(OpenBeam {
                creator,
                secret: secret.to_owned(),
                amount: Amount(amount),
            })
            .await
            .expect("open beam")
    }

    /// Load a beam, panicking if absent.
    pub async fn beam(&self, id: &BeamId) -> Beam {
        self.kernel
            .repository()
            .get(id)
            .await
            .expect("beam exists")
    }
}

impl Default for KernelFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a SQLite-backed kernel at `path`.
pub fn sqlite_kernel(path: impl AsRef<Path>, ledger: Arc<InMemoryLedger>) -> SqliteKernel {
    init_tracing();
    let store = SqliteStore::open(path).expect("open sqlite store");
    Kernel::new(store, ledger, KernelConfig::default()).expect("valid test config")
}

struct BoxedIds(Box<dyn IdGenerator>);

impl IdGenerator for BoxedIds {
    fn generate(&self) -> BeamId {
        self.0.generate()
    }
}

/// Yields a fixed list of ids in order, then repeats the last one.
///
/// Drives collision and exhaustion paths deterministically.
pub struct SequenceIds {
    ids: Vec<BeamId>,
    calls: Arc<AtomicUsize>,
}

impl SequenceIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<BeamId> = ids
            .into_iter()
            .map(|s| BeamId::parse(s.as_ref()).expect("valid fixture id"))
            .collect();
        assert!(!ids.is_empty(), "SequenceIds needs at least one id");
        Self {
            ids,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of `generate` calls.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl IdGenerator for SequenceIds {
    fn generate(&self) -> BeamId {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.ids[n.min(self.ids.len() - 1)].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_ids_repeat_last() {
        let ids = SequenceIds::new(["aaaa", "bbbb"]);
        let calls = ids.calls();
        let drawn: Vec<String> = (0..4).map(|_| ids.generate().to_string()).collect();
        assert_eq!(drawn, vec!["aaaa", "bbbb", "bbbb", "bbbb"]);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_fixture_opens_beams() {
        let fixture = KernelFixture::new();
        let id = fixture.open_beam(alice(), "s1", 5).await;
        assert_eq!(fixture.beam(&id).await.amount, Amount(5));
        assert_eq!(fixture.store.len().unwrap(), 1);
    }
}
