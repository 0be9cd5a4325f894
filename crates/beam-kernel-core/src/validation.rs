//! Structural checks on message fields.

use crate::error::ValidationError;
use crate::types::{Actor, BeamId};

/// Longest actor identity accepted, in bytes.
pub const MAX_ACTOR_LEN: usize = 256;

/// Longest claim secret accepted, in bytes.
pub const MAX_SECRET_LEN: usize = 1024;

/// Largest page a listing will return.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Check an actor field is present and bounded.
pub fn check_actor(field: &'static str, actor: &Actor) -> Result<(), ValidationError> {
    if actor.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    if actor.as_str().len() > MAX_ACTOR_LEN {
        return Err(ValidationError::FieldTooLong {
            field,
            max: MAX_ACTOR_LEN,
        });
    }
    Ok(())
}

/// Check a claim secret is present and bounded.
pub fn check_secret(secret: &str) -> Result<(), ValidationError> {
    if secret.is_empty() {
        return Err(ValidationError::EmptyField { field: "secret" });
    }
    if secret.len() > MAX_SECRET_LEN {
        return Err(ValidationError::FieldTooLong {
            field: "secret",
            max: MAX_SECRET_LEN,
        });
    }
    Ok(())
}

/// Parse an untrusted identifier, such as one taken from a query path.
pub fn parse_beam_id(raw: &str) -> Result<BeamId, ValidationError> {
    BeamId::parse(raw).map_err(|_| ValidationError::MalformedId(raw.to_owned()))
}

/// Check a client-supplied page limit.
pub fn check_page_limit(limit: usize) -> Result<(), ValidationError> {
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(ValidationError::InvalidLimit {
            limit,
            max: MAX_PAGE_SIZE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_bounds() {
        assert!(check_actor("creator", &Actor::new("alice")).is_ok());
        assert_eq!(
            check_actor("creator", &Actor::new("")),
            Err(ValidationError::EmptyField { field: "creator" })
        );
        assert!(check_actor("creator", &Actor::new("a".repeat(MAX_ACTOR_LEN))).is_ok());
        assert_eq!(
            check_actor("creator", &Actor::new("a".repeat(MAX_ACTOR_LEN + 1))),
            Err(ValidationError::FieldTooLong {
                field: "creator",
                max: MAX_ACTOR_LEN
            })
        );
    }

    #[test]
    fn test_secret_bounds() {
        assert!(check_secret("s").is_ok());
        assert!(check_secret("").is_err());
        assert!(check_secret(&"x".repeat(MAX_SECRET_LEN + 1)).is_err());
    }

    #[test]
    fn test_parse_beam_id() {
        assert_eq!(parse_beam_id("abc").unwrap().as_str(), "abc");
        assert_eq!(
            parse_beam_id("../etc"),
            Err(ValidationError::MalformedId("../etc".into()))
        );
    }

    #[test]
    fn test_page_limit_bounds() {
        assert!(check_page_limit(1).is_ok());
        assert!(check_page_limit(MAX_PAGE_SIZE).is_ok());
        assert_eq!(
            check_page_limit(0),
            Err(ValidationError::InvalidLimit {
                limit: 0,
                max: MAX_PAGE_SIZE
            })
        );
        assert!(check_page_limit(usize::MAX).is_err());
    }
}
