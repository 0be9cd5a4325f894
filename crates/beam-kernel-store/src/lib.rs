//! # Beam Kernel Store
//!
//! Storage abstraction for the Beam Kernel: a sorted key-value contract with
//! prefix-scoped iteration, plus SQLite and in-memory implementations.
//!
//! ## Key Types
//!
//! - [`KvStore`] - The async trait for all storage operations
//! - [`PrefixStore`] - A namespace-scoped view over any store
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use beam_kernel_store::{KvStore, PrefixStore, SqliteStore};
//!
//! async fn example() -> beam_kernel_store::Result<()> {
//!     let store = PrefixStore::new(SqliteStore::open("beams.db")?, "Beam/value/");
//!     store.set(b"k3Xa_9-QpL", b"...").await?;
//!     let page = store.scan_prefix(b"", None, 50).await?;
//!     # let _ = page;
//!     Ok(())
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Byte order**: keys sort by raw bytes in every backend
//! - **Resumable scans**: pass the last key of a page as `after`
//! - **Single-key atomicity**: every mutation is one put or delete

pub mod error;
pub mod memory;
pub mod migration;
pub mod prefix;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use prefix::PrefixStore;
pub use sqlite::SqliteStore;
pub use traits::{prefix_successor, Entry, KvStore, StoreExt, DEFAULT_PAGE_SIZE};
