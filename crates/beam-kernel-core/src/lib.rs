//! # Beam Kernel Core
//!
//! Pure primitives for the Beam Kernel: beams, claim secrets, identifiers,
//! messages and canonicalization.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`Beam`] - The escrow entity
//! - [`BeamId`] - Random URL-safe identifier
//! - [`BeamStatus`] - Lifecycle status, with [`Transition`] rules
//! - [`ClaimSecret`] - What a claimant must present
//! - [`BeamMsg`] - Commands accepted by the lifecycle engine
//!
//! ## Canonicalization
//!
//! Beams are stored as deterministic CBOR. See [`canonical`] module.

pub mod beam;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod ids;
pub mod messages;
pub mod types;
pub mod validation;

pub use beam::{Beam, BeamStatus, Transition};
pub use canonical::{canonical_bytes, decode_beam};
pub use crypto::{commit_secret, Blake3Hash, ClaimSecret, SecretMode};
pub use error::{CoreError, ValidationError};
pub use ids::{IdGenerator, RandomIdGenerator, DEFAULT_ID_LENGTH, MIN_ID_LENGTH};
pub use messages::{BeamMsg, CancelBeam, ClaimBeam, CloseBeam, IncreaseBeam, OpenBeam};
pub use types::{Actor, Amount, BeamId, MAX_BEAM_ID_LEN};
pub use validation::{check_page_limit, parse_beam_id, MAX_PAGE_SIZE};
