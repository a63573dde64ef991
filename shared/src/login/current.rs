//! Current proof scheme: HMAC-SHA512 of a server nonce, keyed with a
//! PBKDF2-HMAC-SHA512 stretch of the password.

use std::num::NonZeroU32;

use ring::{hmac, pbkdf2};

use crate::{
    login::{
        decoded, error::AuthenticationError, random_bytes, CURRENT_NONCE, CURRENT_PROOF,
        CURRENT_SALT,
    },
    Properties,
};

const NONCE_LENGTH: usize = 32;
const SALT_LENGTH: usize = 32;
const KEY_LENGTH: usize = 64;
const ITERATIONS: NonZeroU32 = match NonZeroU32::new(20_000) {
    Some(iterations) => iterations,
    None => panic!("iteration count must be non-zero"),
};

/// Challenge properties for this scheme
pub fn new_challenge() -> Result<Properties, AuthenticationError> {
    let nonce = random_bytes::<NONCE_LENGTH>()?;
    let salt = random_bytes::<SALT_LENGTH>()?;
    Ok(Properties::from([
        (CURRENT_NONCE.to_string(), base64::encode(nonce)),
        (CURRENT_SALT.to_string(), base64::encode(salt)),
    ]))
}

/// Response properties proving knowledge of `password`
pub fn new_response(
    password: &str,
    challenge: &Properties,
) -> Result<Properties, AuthenticationError> {
    let nonce = decoded(challenge, CURRENT_NONCE)?;
    let key = derive_key(password, &decoded(challenge, CURRENT_SALT)?);
    let tag = hmac::sign(&key, &nonce);
    Ok(Properties::from([(
        CURRENT_PROOF.to_string(),
        base64::encode(tag.as_ref()),
    )]))
}

pub fn can_process_response(response: &Properties) -> bool {
    response.contains_key(CURRENT_PROOF)
}

/// Whether `challenge` offers this scheme
pub fn is_offered(challenge: &Properties) -> bool {
    challenge.contains_key(CURRENT_NONCE) && challenge.contains_key(CURRENT_SALT)
}

/// Verifies the proof in `response` against `password`
pub fn authenticate(
    password: &str,
    challenge: &Properties,
    response: &Properties,
) -> Result<(), AuthenticationError> {
    let nonce = decoded(challenge, CURRENT_NONCE)?;
    let salt = decoded(challenge, CURRENT_SALT)?;
    let provided = decoded(response, CURRENT_PROOF)?;
    hmac::verify(&derive_key(password, &salt), &nonce, &provided)
        .map_err(|_| AuthenticationError::ProofMismatch)
}

fn derive_key(password: &str, salt: &[u8]) -> hmac::Key {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA512,
        ITERATIONS,
        salt,
        password.as_bytes(),
        &mut key,
    );
    hmac::Key::new(hmac::HMAC_SHA512, &key)
}
