//! Canonical CBOR encoding for deterministic serialization.
//!
//! This module implements RFC 8949 Core Deterministic Encoding for beams:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats
//!
//! Decoding is strict. Input is accepted only if re-encoding the decoded beam
//! reproduces it byte for byte, so truncated, padded, reordered or otherwise
//! non-canonical bytes are rejected rather than repaired.

use ciborium::value::Value;

use crate::beam::{Beam, BeamStatus};
use crate::crypto::{Blake3Hash, ClaimSecret};
use crate::error::CoreError;
use crate::types::{Actor, Amount, BeamId};

/// Current encoding version.
pub const CODEC_VERSION: u64 = 0;

/// Beam field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const VERSION: u64 = 0;
    pub const ID: u64 = 1;
    pub const CREATOR: u64 = 2;
    pub const SECRET_KIND: u64 = 3;
    pub const SECRET: u64 = 4;
    pub const AMOUNT: u64 = 5;
    pub const STATUS: u64 = 6;
}

/// Secret kind discriminators.
mod secret_kind {
    pub const PLAINTEXT: u64 = 0;
    pub const COMMITMENT: u64 = 1;
}

/// A value the beam encoder knows how to write.
enum Field<'a> {
    Uint(u64),
    Text(&'a str),
    Bytes(&'a [u8]),
}

/// Encode a beam to canonical bytes.
pub fn canonical_bytes(beam: &Beam) -> Vec<u8> {
    let (kind, secret) = match &beam.secret {
        ClaimSecret::Plaintext(s) => (secret_kind::PLAINTEXT, Field::Text(s)),
        ClaimSecret::Commitment(h) => (secret_kind::COMMITMENT, Field::Bytes(h.as_bytes())),
    };

    let entries = vec![
        (keys::VERSION, Field::Uint(CODEC_VERSION)),
        (keys::ID, Field::Text(beam.id.as_str())),
        (keys::CREATOR, Field::Text(beam.creator.as_str())),
        (keys::SECRET_KIND, Field::Uint(kind)),
        (keys::SECRET, secret),
        (keys::AMOUNT, Field::Uint(beam.amount.value())),
        (keys::STATUS, Field::Uint(beam.status.to_u8().into())),
    ];

    let mut buf = Vec::with_capacity(64);
    encode_map_canonical(&mut buf, entries);
    buf
}

fn encode_field(buf: &mut Vec<u8>, field: &Field<'_>) {
    match field {
        Field::Uint(n) => encode_uint(buf, 0, *n),
        Field::Bytes(b) => encode_bytes(buf, b),
        Field::Text(s) => encode_text(buf, s),
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: Vec<(u64, Field<'_>)>) {
    let mut pairs: Vec<(Vec<u8>, Field<'_>)> = entries
        .into_iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::with_capacity(1);
            encode_uint(&mut key_buf, 0, k);
            (key_buf, v)
        })
        .collect();

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in &pairs {
        buf.extend_from_slice(key_bytes);
        encode_field(buf, value);
    }
}

/// Decode a beam from canonical bytes.
pub fn decode_beam(bytes: &[u8]) -> Result<Beam, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Decoding("empty input".into()));
    }

    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| CoreError::Decoding(e.to_string()))?;

    let beam = cbor_value_to_beam(&value)?;

    // Catches trailing bytes, duplicate or unknown keys, and non-minimal ints.
    if canonical_bytes(&beam) != bytes {
        return Err(CoreError::Decoding("non-canonical encoding".into()));
    }

    Ok(beam)
}

/// Convert a CBOR Value (map) back to a Beam.
fn cbor_value_to_beam(value: &Value) -> Result<Beam, CoreError> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(CoreError::Decoding("expected map".into())),
    };

    let get = |key: u64| {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == key as i128))
            .map(|(_, v)| v)
    };

    let uint = |key: u64, name: &str| -> Result<u64, CoreError> {
        match get(key) {
            Some(Value::Integer(i)) => u64::try_from(*i)
                .map_err(|_| CoreError::Decoding(format!("{} out of range", name))),
            _ => Err(CoreError::Decoding(format!("missing {}", name))),
        }
    };

    let text = |key: u64, name: &str| -> Result<String, CoreError> {
        match get(key) {
            Some(Value::Text(s)) => Ok(s.clone()),
            _ => Err(CoreError::Decoding(format!("missing {}", name))),
        }
    };

    let version = uint(keys::VERSION, "version")?;
    if version != CODEC_VERSION {
        return Err(CoreError::Decoding(format!(
            "unsupported version: {}",
            version
        )));
    }

    let id = BeamId::parse(text(keys::ID, "id")?)
        .map_err(|e| CoreError::Decoding(e.to_string()))?;

    let creator = Actor::new(text(keys::CREATOR, "creator")?);

    let secret = match uint(keys::SECRET_KIND, "secret kind")? {
        secret_kind::PLAINTEXT => ClaimSecret::Plaintext(text(keys::SECRET, "secret")?),
        secret_kind::COMMITMENT => match get(keys::SECRET) {
            Some(Value::Bytes(b)) if b.len() == 32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(b);
                ClaimSecret::Commitment(Blake3Hash(arr))
            }
            _ => return Err(CoreError::Decoding("invalid secret commitment".into())),
        },
        other => {
            return Err(CoreError::Decoding(format!(
                "unknown secret kind: {}",
                other
            )))
        }
    };

    let amount = Amount::new(uint(keys::AMOUNT, "amount")?);

    let raw_status = uint(keys::STATUS, "status")?;
    let status = u8::try_from(raw_status)
        .ok()
        .and_then(BeamStatus::from_u8)
        .ok_or(CoreError::UnknownStatus(raw_status))?;

    Ok(Beam {
        id,
        creator,
        secret,
        amount,
        status,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::crypto::SecretMode;
    use proptest::prelude::*;

    fn arb_beam() -> impl Strategy<Value = Beam> {
        (
            "[A-Za-z0-9_-]{1,64}",
            ".{0,40}",
            ".{1,40}",
            any::<bool>(),
            any::<u64>(),
            0u8..4,
        )
            .prop_map(|(id, creator, secret, plaintext, amount, status)| {
                let mode = if plaintext {
                    SecretMode::Plaintext
                } else {
                    SecretMode::Commitment
                };
                let mut beam = Beam::open(
                    BeamId::parse(id).unwrap(),
                    Actor::new(creator),
                    ClaimSecret::seal(&secret, mode),
                    Amount(amount),
                );
                beam.status = BeamStatus::from_u8(status).unwrap();
                beam
            })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(beam in arb_beam()) {
            let bytes = canonical_bytes(&beam);
            let decoded = decode_beam(&bytes).unwrap();
            prop_assert_eq!(&decoded, &beam);
            prop_assert_eq!(canonical_bytes(&decoded), bytes);
        }

        #[test]
        fn decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
            let _ = decode_beam(&bytes);
        }
    }
}
