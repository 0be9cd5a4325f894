//! # Beam Kernel Testkit
//!
//! Testing utilities for the Beam Kernel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known beams with their expected canonical bytes
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A ready-made kernel over in-memory or SQLite storage
//!
//! ## Golden Vectors
//!
//! ```rust
//! use beam_kernel_testkit::vectors::{all_vectors, verify_all_vectors};
//!
//! assert!(verify_all_vectors().is_ok());
//! for vector in all_vectors() {
//!     println!("{}: {}", vector.name, vector.expected_hex());
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use beam_kernel_testkit::generators::beam;
//!
//! proptest! {
//!     #[test]
//!     fn encoding_is_deterministic(b in beam()) {
//!         prop_assert_eq!(canonical_bytes(&b), canonical_bytes(&b.clone()));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,ignore
//! use beam_kernel_testkit::fixtures::{alice, KernelFixture};
//!
//! let fixture = KernelFixture::new();
//! let id = fixture.open_beam(alice(), "s1", 100).await;
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{alice, bob, carol, init_tracing, KernelFixture, SequenceIds};
pub use generators::{beam, LifecycleOp};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
