//! Beam: an escrowed, claimable amount of value.
//!
//! A beam is opened `Pending` and leaves that state exactly once, to one of
//! three terminal statuses. Terminal beams are never mutated or deleted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::ClaimSecret;
use crate::types::{Actor, Amount, BeamId};

/// Lifecycle status of a beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum BeamStatus {
    /// Open; accepts increases and exactly one terminal transition.
    Pending = 0,
    /// Settled by the creator.
    Finalized = 1,
    /// Canceled by the creator, value refunded.
    Canceled = 2,
    /// Claimed by a secret holder.
    Claimed = 3,
}

impl BeamStatus {
    /// Convert to u8 for serialization.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Try to parse from u8.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Pending),
            1 => Some(Self::Finalized),
            2 => Some(Self::Canceled),
            3 => Some(Self::Claimed),
            _ => None,
        }
    }

    /// Lowercase name, as rendered to clients.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Finalized => "finalized",
            Self::Canceled => "canceled",
            Self::Claimed => "claimed",
        }
    }

    /// Whether no further mutation is permitted.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// The status reached by applying `transition`, or `None` if illegal.
    pub fn apply(self, transition: Transition) -> Option<BeamStatus> {
        match (self, transition) {
            (Self::Pending, Transition::Increase) => Some(Self::Pending),
            (Self::Pending, Transition::Close) => Some(Self::Finalized),
            (Self::Pending, Transition::Cancel) => Some(Self::Canceled),
            (Self::Pending, Transition::Claim) => Some(Self::Claimed),
            _ => None,
        }
    }
}

impl fmt::Display for BeamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post-open operation on a beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Increase,
    Close,
    Cancel,
    Claim,
}

impl Transition {
    /// Operation name, for logs and errors.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Close => "close",
            Self::Cancel => "cancel",
            Self::Claim => "claim",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The escrow entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beam {
    /// Random identifier, fixed at creation.
    pub id: BeamId,

    /// Who opened the beam. Sole authorizer of increase, close and cancel.
    pub creator: Actor,

    /// What a claimant must present.
    pub secret: ClaimSecret,

    /// Value held in escrow.
    pub amount: Amount,

    /// Lifecycle status.
    pub status: BeamStatus,
}

impl Beam {
    /// Create a freshly opened beam.
    pub fn open(id: BeamId, creator: Actor, secret: ClaimSecret, amount: Amount) -> Self {
        Self {
            id,
            creator,
            secret,
            amount,
            status: BeamStatus::Pending,
        }
    }

    /// Whether the beam still accepts operations.
    pub fn is_pending(&self) -> bool {
        self.status == BeamStatus::Pending
    }

    /// Whether `actor` opened this beam.
    pub fn is_creator(&self, actor: &Actor) -> bool {
        &self.creator == actor
    }
}
