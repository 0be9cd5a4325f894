//! Beam identifier generation.
//!
//! Identifiers are drawn from the operating system CSPRNG and rendered in the
//! URL-safe base64 alphabet, so they are unguessable and can be used in paths
//! and query strings without escaping. Generators do not check uniqueness;
//! the caller retries against its store.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CoreError;
use crate::types::{BeamId, MAX_BEAM_ID_LEN};

/// Default identifier length, in characters.
pub const DEFAULT_ID_LENGTH: usize = 10;

/// Shortest identifier length a generator will produce.
pub const MIN_ID_LENGTH: usize = 4;

/// A source of candidate beam identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produce the next candidate identifier.
    fn generate(&self) -> BeamId;
}

/// Random URL-safe identifiers of a fixed length.
#[derive(Debug, Clone)]
pub struct RandomIdGenerator {
    length: usize,
}

impl RandomIdGenerator {
    /// Create a generator for identifiers of `length` characters.
    pub fn new(length: usize) -> Result<Self, CoreError> {
        if !(MIN_ID_LENGTH..=MAX_BEAM_ID_LEN).contains(&length) {
            return Err(CoreError::InvalidIdentifier(format!(
                "identifier length {} outside {}..={}",
                length, MIN_ID_LENGTH, MAX_BEAM_ID_LEN
            )));
        }
        Ok(Self { length })
    }

    /// The configured identifier length.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_ID_LENGTH,
        }
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> BeamId {
        let token = secure_token(self.length);
        // The alphabet and length bounds were checked in `new`.
        BeamId::parse(token).unwrap_or_else(|e| unreachable!("generated invalid id: {e}"))
    }
}

/// Generate `length` characters of URL-safe randomness.
pub fn secure_token(length: usize) -> String {
    // Each base64 character carries 6 bits.
    let mut bytes = vec![0u8; (length * 6 + 7) / 8];
    OsRng.fill_bytes(&mut bytes);

    let mut token = URL_SAFE_NO_PAD.encode(&bytes);
    token.truncate(length);
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_length_and_alphabet() {
        for length in [MIN_ID_LENGTH, DEFAULT_ID_LENGTH, 11, 33, MAX_BEAM_ID_LEN] {
            let token = secure_token(length);
            assert_eq!(token.len(), length);
            assert!(token
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
        }
    }

    #[test]
    fn test_generator_rejects_bad_lengths() {
        assert!(RandomIdGenerator::new(0).is_err());
        assert!(RandomIdGenerator::new(MIN_ID_LENGTH - 1).is_err());
        assert!(RandomIdGenerator::new(MAX_BEAM_ID_LEN + 1).is_err());
        assert_eq!(RandomIdGenerator::new(16).unwrap().length(), 16);
    }

    #[test]
    fn test_default_generator() {
        let id = RandomIdGenerator::default().generate();
        assert_eq!(id.as_str().len(), DEFAULT_ID_LENGTH);
    }

    #[test]
    fn test_ids_do_not_repeat() {
        let generator = RandomIdGenerator::default();
        let ids: HashSet<BeamId> = (0..10_000).map(|_| generator.generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
