//! # Beam Kernel
//!
//! Escrowed, secret-claimable value ("beams") with a persistent lifecycle.
//!
//! ## Overview
//!
//! A beam holds an amount in escrow. Its creator may top it up, close it or
//! cancel it; anyone holding its secret may claim it. Each beam leaves
//! `pending` exactly once:
//!
//! ```text
//!            increase
//!            ┌──────┐
//!            ▼      │
//!   open ─▶ pending ─┼─ close  ─▶ finalized
//!                    ├─ cancel ─▶ canceled
//!                    └─ claim  ─▶ claimed
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use beam_kernel::{Kernel, KernelConfig};
//! use beam_kernel::core::{Actor, Amount, ClaimBeam, OpenBeam};
//! use beam_kernel::store::SqliteStore;
//! use beam_kernel::transfer::memory::InMemoryLedger;
//!
//! async fn example() -> beam_kernel::Result<()> {
//!     let store = SqliteStore::open("beams.db")?;
//!     let kernel = Kernel::new(store, InMemoryLedger::new(), KernelConfig::default())?;
//!
//!     let id = kernel
//!         .open(OpenBeam {
//!             creator: Actor::new("alice"),
//!             secret: "s1".into(),
//!             amount: Amount(100),
//!         })
//!         .await?;
//!
//!     kernel
//!         .claim(ClaimBeam {
//!             id,
//!             secret: "s1".into(),
//!             claimer: Actor::new("bob"),
//!         })
//!         .await?;
//!
//!     let json = kernel.query().list_all_json().await?;
//!     # let _ = json;
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `beam_kernel::core` - Core primitives (Beam, BeamId, messages, codec)
//! - `beam_kernel::store` - Storage abstraction, memory and SQLite backends

pub mod config;
pub mod error;
pub mod kernel;
mod locks;
pub mod query;
pub mod repository;
pub mod transfer;

// Re-export component crates
pub use beam_kernel_core as core;
pub use beam_kernel_store as store;

// Re-export main types for convenience
pub use config::KernelConfig;
pub use error::{KernelError, Result};
pub use kernel::{Kernel, MsgOutcome};
pub use query::{BeamView, QueryService, ViewPage};
pub use repository::{BeamPage, BeamRepository, BEAM_PREFIX};
pub use transfer::{Account, TransferError, ValueTransfer};

// Re-export commonly used core types
pub use beam_kernel_core::{
    Actor, Amount, Beam, BeamId, BeamMsg, BeamStatus, CancelBeam, ClaimBeam, ClaimSecret,
    CloseBeam, IncreaseBeam, OpenBeam, SecretMode, Transition,
};
