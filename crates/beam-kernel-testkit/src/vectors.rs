//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical encoding of beams. A change to any of them
//! is a storage format change and needs a new codec version.

use beam_kernel_core::{
    canonical_bytes, commit_secret, decode_beam, Actor, Amount, Beam, BeamId, BeamStatus,
    ClaimSecret, SecretMode,
};

/// Placeholder for the 32-byte secret commitment in `expected_hex`.
pub const DIGEST_PLACEHOLDER: &str = "{digest}";

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub id: &'static str,
    pub creator: &'static str,
    pub secret: &'static str,
    pub mode: SecretMode,
    pub amount: u64,
    pub status: BeamStatus,
    /// Expected canonical bytes (hex). Commitment vectors carry
    /// [`DIGEST_PLACEHOLDER`] where the digest goes.
    pub expected: &'static str,
}

impl GoldenVector {
    /// Build the beam this vector describes.
    pub fn beam(&self) -> Beam {
        let mut beam = Beam::open(
            BeamId::parse(self.id).expect("vector id is valid"),
            Actor::new(self.creator),
            ClaimSecret::seal(self.secret, self.mode),
            Amount(self.amount),
        );
        beam.status = self.status;
        beam
    }

    /// Expected canonical bytes as hex, with any digest filled in.
    pub fn expected_hex(&self) -> String {
        self.expected
            .replace(DIGEST_PLACEHOLDER, &commit_secret(self.secret).to_hex())
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "pending plaintext beam",
            id: "k3Xa_9-QpL",
            creator: "alice",
            secret: "s1",
            mode: SecretMode::Plaintext,
            amount: 100,
            status: BeamStatus::Pending,
            expected: "a70000016a6b3358615f392d51704c0265616c6963650300046273310518640600",
        },
        GoldenVector {
            name: "claimed beam with zero amount",
            id: "ZZZZZZZZZZ",
            creator: "bob",
            secret: "x",
            mode: SecretMode::Plaintext,
            amount: 0,
            status: BeamStatus::Claimed,
            expected: "a70000016a5a5a5a5a5a5a5a5a5a5a0263626f62030004617805000603",
        },
        GoldenVector {
            name: "finalized beam, one-char id, four-byte amount",
            id: "a",
            creator: "cosmos1xyz",
            secret: "open sesame",
            mode: SecretMode::Plaintext,
            amount: 1_000_000,
            status: BeamStatus::Finalized,
            expected: "a70000016161026a636f736d6f733178797a0300046b6f70656e20736573616d65051a000f42400601",
        },
        GoldenVector {
            name: "canceled beam holding u64::MAX",
            id: "Beam-_-_-_",
            creator: "carol",
            secret: "s",
            mode: SecretMode::Plaintext,
            amount: u64::MAX,
            status: BeamStatus::Canceled,
            expected: "a70000016a4265616d2d5f2d5f2d5f02656361726f6c0300046173051bffffffffffffffff0602",
        },
        GoldenVector {
            name: "pending committed beam",
            id: "k3Xa_9-QpL",
            creator: "alice",
            secret: "s1",
            mode: SecretMode::Commitment,
            amount: 100,
            status: BeamStatus::Pending,
            expected: "a70000016a6b3358615f392d51704c0265616c6963650301045820{digest}0518640600",
        },
    ]
}

/// Check every vector encodes to its expected bytes and decodes back.
///
/// Returns the name of the first failing vector.
pub fn verify_all_vectors() -> Result<(), String> {
    for vector in all_vectors() {
        let beam = vector.beam();
        let actual = hex::encode(canonical_bytes(&beam));
        if actual != vector.expected_hex() {
            return Err(format!(
                "{}: expected {}, got {}",
                vector.name,
                vector.expected_hex(),
                actual
            ));
        }
        match decode_beam(&canonical_bytes(&beam)) {
            Ok(decoded) if decoded == beam => {}
            _ => return Err(format!("{}: does not decode back", vector.name)),
        }
    }
    Ok(())
}
