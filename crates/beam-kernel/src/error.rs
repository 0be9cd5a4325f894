//! Error types for the Kernel.

use beam_kernel_core::{Actor, Amount, BeamId, BeamStatus, CoreError, Transition, ValidationError};
use beam_kernel_store::StoreError;
use thiserror::Error;

use crate::transfer::TransferError;

/// Errors that can occur during Kernel operations.
///
/// A failed operation never leaves a partial write behind.
#[derive(Debug, Error)]
pub enum KernelError {
    /// No beam is stored under this id.
    #[error("beam not found: {0}")]
    NotFound(BeamId),

    /// Wrong updater, or wrong secret on claim.
    #[error("{actor} is not authorized to {operation} beam {id}")]
    NotAuthorized {
        id: BeamId,
        actor: Actor,
        operation: Transition,
    },

    /// The beam is terminal and cannot take this transition.
    #[error("cannot {operation} beam {id}: status is {status}")]
    InvalidState {
        id: BeamId,
        status: BeamStatus,
        operation: Transition,
    },

    /// An increase would overflow the beam's amount.
    #[error("increasing beam {id} by {increase} would overflow its amount {amount}")]
    AmountOverflow {
        id: BeamId,
        amount: Amount,
        increase: Amount,
    },

    /// Every candidate identifier drawn was already taken.
    #[error("no free beam identifier after {attempts} attempts")]
    ExhaustedIdentifierSpace { attempts: u32 },

    /// The value transfer backing a transition failed; the beam is unchanged.
    #[error("value transfer for beam {id} failed: {source}")]
    TransferFailed {
        id: BeamId,
        #[source]
        source: TransferError,
    },

    /// Message failed structural validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration rejected at startup.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Stored bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// JSON rendering of a query result failed.
    #[error("render error: {0}")]
    Render(#[from] serde_json::Error),
}

impl KernelError {
    /// Whether this error comes from the store or codec rather than from a
    /// business rule. These indicate corruption or an unavailable backend.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            KernelError::Decode(_) | KernelError::Store(_) | KernelError::Render(_)
        )
    }
}

/// Result type for Kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
