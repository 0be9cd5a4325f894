//! Claim secrets.
//!
//! A beam is claimed by whoever presents the secret its creator chose at open
//! time. The secret can be kept as plaintext (the historical behaviour) or as
//! a domain-separated Blake3 commitment, in which case the plaintext never
//! reaches the store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain separator for secret commitments.
const SECRET_DOMAIN: &[u8] = b"beam-secret-v0:";

/// A 32-byte Blake3 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blake3Hash(pub [u8; 32]);

impl Blake3Hash {
    /// Compute the Blake3 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Compare in constant time.
    pub fn ct_eq(&self, other: &Blake3Hash) -> bool {
        blake3::Hash::from(self.0) == blake3::Hash::from(other.0)
    }
}

impl fmt::Debug for Blake3Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blake3({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Blake3Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Blake3Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Commit to a claim secret.
pub fn commit_secret(secret: &str) -> Blake3Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(SECRET_DOMAIN);
    hasher.update(secret.as_bytes());
    Blake3Hash(*hasher.finalize().as_bytes())
}

/// How a claim secret is kept at rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretMode {
    /// Store the secret verbatim.
    Plaintext,
    /// Store only a Blake3 commitment to the secret.
    #[default]
    Commitment,
}

/// A claim secret as stored on a beam.
#[derive(Clone, PartialEq, Eq)]
pub enum ClaimSecret {
    /// The secret as the creator supplied it.
    Plaintext(String),
    /// A commitment produced by [`commit_secret`].
    Commitment(Blake3Hash),
}

impl ClaimSecret {
    /// Seal a creator-supplied secret according to `mode`.
    pub fn seal(secret: &str, mode: SecretMode) -> Self {
        match mode {
            SecretMode::Plaintext => ClaimSecret::Plaintext(secret.to_owned()),
            SecretMode::Commitment => ClaimSecret::Commitment(commit_secret(secret)),
        }
    }

    /// Check a presented secret.
    ///
    /// Both arms compare 32-byte digests in constant time, so the comparison
    /// leaks neither the stored secret's length nor a matching prefix.
    pub fn matches(&self, presented: &str) -> bool {
        let presented = commit_secret(presented);
        match self {
            ClaimSecret::Plaintext(stored) => commit_secret(stored).ct_eq(&presented),
            ClaimSecret::Commitment(stored) => stored.ct_eq(&presented),
        }
    }

    /// The mode this secret was sealed with.
    pub fn mode(&self) -> SecretMode {
        match self {
            ClaimSecret::Plaintext(_) => SecretMode::Plaintext,
            ClaimSecret::Commitment(_) => SecretMode::Commitment,
        }
    }
}

impl fmt::Debug for ClaimSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimSecret::Plaintext(_) => f.write_str("ClaimSecret::Plaintext(<redacted>)"),
            ClaimSecret::Commitment(h) => write!(f, "ClaimSecret::Commitment({:?})", h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake3_hash() {
        let data = b"test data";
        let h1 = Blake3Hash::hash(data);
        let h2 = Blake3Hash::hash(data);
        assert_eq!(h1, h2);
        assert!(h1.ct_eq(&h2));

        let h3 = Blake3Hash::hash(b"different data");
        assert_ne!(h1, h3);
        assert!(!h1.ct_eq(&h3));
    }

    #[test]
    fn test_commitment_is_domain_separated() {
        assert_ne!(commit_secret("s1"), Blake3Hash::hash(b"s1"));
        assert_eq!(commit_secret("s1"), commit_secret("s1"));
    }

    #[test]
    fn test_secret_matches_in_both_modes() {
        for mode in [SecretMode::Plaintext, SecretMode::Commitment] {
            let sealed = ClaimSecret::seal("s2", mode);
            assert_eq!(sealed.mode(), mode);
            assert!(sealed.matches("s2"));
            assert!(!sealed.matches("wrong"));
            assert!(!sealed.matches(""));
            assert!(!sealed.matches("s2 "));
        }
    }

    #[test]
    fn test_commitment_does_not_keep_plaintext() {
        let sealed = ClaimSecret::seal("hunter2", SecretMode::Commitment);
        match sealed {
            ClaimSecret::Commitment(h) => assert_eq!(h, commit_secret("hunter2")),
            ClaimSecret::Plaintext(_) => panic!("expected commitment"),
        }
    }

    #[test]
    fn test_debug_redacts_plaintext() {
        let sealed = ClaimSecret::seal("hunter2", SecretMode::Plaintext);
        let debug = format!("{:?}", sealed);
        assert!(!debug.contains("hunter2"));
    }
}
