//! Kernel configuration.

use beam_kernel_core::{SecretMode, DEFAULT_ID_LENGTH, MAX_BEAM_ID_LEN, MIN_ID_LENGTH};
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};

/// Configuration for the Kernel.
///
/// Missing fields take their defaults when deserialized, so an embedding
/// application only has to spell out what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Length of generated beam identifiers, in characters.
    pub id_length: usize,
    /// Fresh identifiers drawn on open before giving up.
    pub max_id_attempts: u32,
    /// How claim secrets are kept at rest.
    pub secret_mode: SecretMode,
    /// Number of per-beam lock stripes.
    pub lock_stripes: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            id_length: DEFAULT_ID_LENGTH,
            max_id_attempts: 16,
            secret_mode: SecretMode::default(),
            lock_stripes: 64,
        }
    }
}

impl KernelConfig {
    /// Reject settings the kernel cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_ID_LENGTH..=MAX_BEAM_ID_LEN).contains(&self.id_length) {
            return Err(KernelError::InvalidConfig(format!(
                "id_length must be within {}..={}, got {}",
                MIN_ID_LENGTH, MAX_BEAM_ID_LEN, self.id_length
            )));
        }
        if self.max_id_attempts == 0 {
            return Err(KernelError::InvalidConfig(
                "max_id_attempts must be at least 1".into(),
            ));
        }
        if self.lock_stripes == 0 {
            return Err(KernelError::InvalidConfig(
                "lock_stripes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
