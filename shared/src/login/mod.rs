//! Vocabulary of the login handshake: the property keys both sides agree on,
//! the engine version, the machine fingerprint format and the two password
//! proof schemes.

pub mod current;
pub mod error;
pub mod fingerprint;
pub mod legacy;
pub mod version;

// Challenge keys (server -> client)
pub const SERVER_VERSION: &str = "server.version";
pub const PASSWORD_REQUIRED: &str = "password.required";
pub const LEGACY_SALT: &str = "legacy.salt";
pub const CURRENT_NONCE: &str = "current.nonce";
pub const CURRENT_SALT: &str = "current.salt";

// Response keys (client -> server)
pub const CLIENT_VERSION: &str = "client.version";
pub const CLIENT_NAME: &str = "client.name";
pub const CLIENT_FINGERPRINT: &str = "client.fingerprint";
pub const LEGACY_PROOF: &str = "legacy.proof";
pub const CURRENT_PROOF: &str = "current.proof";

use crate::{login::error::AuthenticationError, Properties};

pub(crate) fn required<'p>(
    properties: &'p Properties,
    key: &'static str,
) -> Result<&'p str, AuthenticationError> {
    properties
        .get(key)
        .map(String::as_str)
        .ok_or(AuthenticationError::MissingProperty { key })
}

pub(crate) fn decoded(
    properties: &Properties,
    key: &'static str,
) -> Result<Vec<u8>, AuthenticationError> {
    base64::decode(required(properties, key)?)
        .map_err(|_| AuthenticationError::MalformedProperty { key })
}

pub(crate) fn random_bytes<const N: usize>() -> Result<[u8; N], AuthenticationError> {
    use ring::rand::{SecureRandom, SystemRandom};

    let mut bytes = [0u8; N];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AuthenticationError::RandomUnavailable)?;
    Ok(bytes)
}
