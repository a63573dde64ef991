//! Legacy proof scheme: a salted SHA-256 digest of the password.
//!
//! Still offered so that older clients can join; servers prefer the
//! [`current`](super::current) scheme whenever a client answers with it.

use ring::{constant_time, digest};

use crate::{
    login::{decoded, error::AuthenticationError, random_bytes, LEGACY_PROOF, LEGACY_SALT},
    Properties,
};

const SALT_LENGTH: usize = 16;

/// Challenge properties for this scheme
pub fn new_challenge() -> Result<Properties, AuthenticationError> {
    let salt = random_bytes::<SALT_LENGTH>()?;
    Ok(Properties::from([(
        LEGACY_SALT.to_string(),
        base64::encode(salt),
    )]))
}

/// Response properties proving knowledge of `password`
pub fn new_response(
    password: &str,
    challenge: &Properties,
) -> Result<Properties, AuthenticationError> {
    let salt = decoded(challenge, LEGACY_SALT)?;
    Ok(Properties::from([(
        LEGACY_PROOF.to_string(),
        base64::encode(proof(password, &salt)),
    )]))
}

pub fn can_process_response(response: &Properties) -> bool {
    response.contains_key(LEGACY_PROOF)
}

/// Verifies the proof in `response` against `password`
pub fn authenticate(
    password: &str,
    challenge: &Properties,
    response: &Properties,
) -> Result<(), AuthenticationError> {
    let salt = decoded(challenge, LEGACY_SALT)?;
    let provided = decoded(response, LEGACY_PROOF)?;
    let expected = proof(password, &salt);
    constant_time::verify_slices_are_equal(expected.as_ref(), &provided)
        .map_err(|_| AuthenticationError::ProofMismatch)
}

fn proof(password: &str, salt: &[u8]) -> digest::Digest {
    let mut context = digest::Context::new(&digest::SHA256);
    context.update(salt);
    context.update(password.as_bytes());
    context.finish()
}
