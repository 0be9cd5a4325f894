//! Proptest generators for property-based testing.

use proptest::prelude::*;

use beam_kernel_core::{
    Actor, Amount, Beam, BeamId, BeamStatus, ClaimSecret, SecretMode, MAX_BEAM_ID_LEN,
};

/// Generate a well-formed beam identifier.
pub fn beam_id() -> impl Strategy<Value = BeamId> {
    proptest::string::string_regex(&format!("[A-Za-z0-9_-]{{1,{}}}", MAX_BEAM_ID_LEN))
        .expect("valid regex")
        .prop_map(|s| BeamId::parse(s).expect("regex yields valid ids"))
}

/// Generate one of a small cast of actors, so collisions are likely.
pub fn actor() -> impl Strategy<Value = Actor> {
    prop_oneof![
        Just(Actor::new("alice")),
        Just(Actor::new("bob")),
        Just(Actor::new("carol")),
    ]
}

/// Generate a non-empty claim secret.
pub fn secret() -> impl Strategy<Value = String> {
    "[ -~]{1,24}"
}

/// Generate an amount, biased towards the overflow boundary.
pub fn amount() -> impl Strategy<Value = Amount> {
    prop_oneof![
        4 => (0u64..1_000_000).prop_map(Amount),
        1 => (u64::MAX - 1_000..=u64::MAX).prop_map(Amount),
    ]
}

pub fn secret_mode() -> impl Strategy<Value = SecretMode> {
    prop_oneof![Just(SecretMode::Plaintext), Just(SecretMode::Commitment)]
}

pub fn beam_status() -> impl Strategy<Value = BeamStatus> {
    prop_oneof![
        Just(BeamStatus::Pending),
        Just(BeamStatus::Finalized),
        Just(BeamStatus::Canceled),
        Just(BeamStatus::Claimed),
    ]
}

/// Generate a beam in any status.
pub fn beam() -> impl Strategy<Value = Beam> {
    (beam_id(), actor(), secret(), secret_mode(), amount(), beam_status()).prop_map(
        |(id, creator, secret, mode, amount, status)| {
            let mut beam = Beam::open(id, creator, ClaimSecret::seal(&secret, mode), amount);
            beam.status = status;
            beam
        },
    )
}

/// A post-open operation against a single beam.
#[derive(Debug, Clone)]
pub enum LifecycleOp {
    Increase { updater: Actor, amount: Amount },
    Close { updater: Actor },
    Cancel { updater: Actor },
    Claim { correct_secret: bool, claimer: Actor },
}

/// Generate a lifecycle operation.
pub fn lifecycle_op() -> impl Strategy<Value = LifecycleOp> {
    prop_oneof![
        3 => (actor(), amount()).prop_map(|(updater, amount)| LifecycleOp::Increase { updater, amount }),
        1 => actor().prop_map(|updater| LifecycleOp::Close { updater }),
        1 => actor().prop_map(|updater| LifecycleOp::Cancel { updater }),
        1 => (any::<bool>(), actor())
            .prop_map(|(correct_secret, claimer)| LifecycleOp::Claim { correct_secret, claimer }),
    ]
}
