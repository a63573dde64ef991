//! Hashed machine fingerprints.
//!
//! A fingerprint is the fixed magic prefix followed by 22 characters of the
//! crypt alphabet, 28 characters in total. The raw machine identifier never
//! leaves the client.

use ring::digest;

/// Prefix every well-formed fingerprint starts with
pub const MAGIC: &str = "$1$MH$";
/// Exact length of a well-formed fingerprint
pub const LENGTH: usize = 28;

const ALPHABET: &[u8; 64] = b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Hashes a raw machine identifier (e.g. a MAC address) into a fingerprint
pub fn hash_machine_id(machine_id: &[u8]) -> String {
    let mut context = digest::Context::new(&digest::SHA256);
    context.update(MAGIC.as_bytes());
    context.update(machine_id);
    let hashed = context.finish();

    let mut fingerprint = String::with_capacity(LENGTH);
    fingerprint.push_str(MAGIC);
    fingerprint.extend(
        hashed
            .as_ref()
            .iter()
            .take(LENGTH - MAGIC.len())
            .map(|byte| char::from(ALPHABET[usize::from(*byte % 64)])),
    );
    fingerprint
}

/// Whether `fingerprint` has the exact shape [`hash_machine_id`] produces.
/// Anything else has been tampered with.
pub fn is_well_formed(fingerprint: &str) -> bool {
    fingerprint.len() == LENGTH
        && fingerprint.starts_with(MAGIC)
        && fingerprint
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'$' | b'.' | b'/'))
}
