//! Beam messages: the commands accepted by the lifecycle engine.
//!
//! The transport authenticates the actor on each message before it reaches
//! the kernel. Messages carry claim secrets in the clear, so their `Debug`
//! output redacts them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Actor, Amount, BeamId};
use crate::validation::{check_actor, check_secret};
use crate::ValidationError;

/// Open a new beam holding `amount`, claimable with `secret`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenBeam {
    pub creator: Actor,
    pub secret: String,
    pub amount: Amount,
}

/// Add `amount` to a pending beam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncreaseBeam {
    pub id: BeamId,
    pub updater: Actor,
    pub amount: Amount,
}

/// Settle a pending beam back to its creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseBeam {
    pub id: BeamId,
    pub updater: Actor,
}

/// Cancel a pending beam and refund its creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBeam {
    pub id: BeamId,
    pub updater: Actor,
}

/// Claim a pending beam by presenting its secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBeam {
    pub id: BeamId,
    pub secret: String,
    pub claimer: Actor,
}

impl fmt::Debug for OpenBeam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenBeam")
            .field("creator", &self.creator)
            .field("secret", &"<redacted>")
            .field("amount", &self.amount)
            .finish()
    }
}

impl fmt::Debug for ClaimBeam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimBeam")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .field("claimer", &self.claimer)
            .finish()
    }
}

/// Any beam message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BeamMsg {
    Open(OpenBeam),
    Increase(IncreaseBeam),
    Close(CloseBeam),
    Cancel(CancelBeam),
    Claim(ClaimBeam),
}

impl BeamMsg {
    /// Operation name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BeamMsg::Open(_) => "open",
            BeamMsg::Increase(_) => "increase",
            BeamMsg::Close(_) => "close",
            BeamMsg::Cancel(_) => "cancel",
            BeamMsg::Claim(_) => "claim",
        }
    }

    /// The beam this message targets, if it targets an existing one.
    pub fn beam_id(&self) -> Option<&BeamId> {
        match self {
            BeamMsg::Open(_) => None,
            BeamMsg::Increase(m) => Some(&m.id),
            BeamMsg::Close(m) => Some(&m.id),
            BeamMsg::Cancel(m) => Some(&m.id),
            BeamMsg::Claim(m) => Some(&m.id),
        }
    }

    /// Stateless structural checks. Nothing here reads the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            BeamMsg::Open(m) => m.validate(),
            BeamMsg::Increase(m) => m.validate(),
            BeamMsg::Close(m) => m.validate(),
            BeamMsg::Cancel(m) => m.validate(),
            BeamMsg::Claim(m) => m.validate(),
        }
    }
}

impl OpenBeam {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_actor("creator", &self.creator)?;
        check_secret(&self.secret)
    }
}

impl IncreaseBeam {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_actor("updater", &self.updater)
    }
}

impl CloseBeam {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_actor("updater", &self.updater)
    }
}

impl CancelBeam {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_actor("updater", &self.updater)
    }
}

impl ClaimBeam {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_actor("claimer", &self.claimer)?;
        check_secret(&self.secret)
    }
}

macro_rules! impl_from_msg {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for BeamMsg {
                fn from(msg: $ty) -> Self {
                    BeamMsg::$variant(msg)
                }
            }
        )*
    };
}

impl_from_msg! {
    OpenBeam => Open,
    IncreaseBeam => Increase,
    CloseBeam => Close,
    CancelBeam => Cancel,
    ClaimBeam => Claim,
}
