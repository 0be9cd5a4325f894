//! Strong type definitions for the Beam Kernel.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Longest beam identifier accepted anywhere in the kernel.
pub const MAX_BEAM_ID_LEN: usize = 64;

/// A beam identifier.
///
/// Drawn from the URL-safe base64 alphabet (`A-Z a-z 0-9 - _`). The id is the
/// only lookup key for a beam and the suffix of its store key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BeamId(String);

impl BeamId {
    /// Parse an identifier, rejecting empty, oversized or non URL-safe input.
    pub fn parse(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.is_empty() || s.len() > MAX_BEAM_ID_LEN || !s.bytes().all(is_url_safe) {
            return Err(CoreError::InvalidIdentifier(s));
        }
        Ok(Self(s))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the identifier bytes (used as the store key suffix).
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

fn is_url_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

impl fmt::Debug for BeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeamId({})", self.0)
    }
}

impl fmt::Display for BeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BeamId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BeamId {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for BeamId {
    type Error = CoreError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<BeamId> for String {
    fn from(id: BeamId) -> Self {
        id.0
    }
}

/// An authenticated actor identity (an account address).
///
/// The kernel never verifies identities itself; the transport layer hands it
/// an actor it has already authenticated.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    /// Wrap an already-authenticated identity.
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    /// Get the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identity is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Actor({})", self.0)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Actor {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Actor {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A non-negative quantity of value held in escrow.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(pub u64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Create from a raw quantity.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw quantity.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Add two amounts, returning `None` on overflow.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Whether this amount is zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
