//! # Skirmish Client
//! The joining side of the login handshake: answers a server challenge with
//! the client's version, name, machine fingerprint and password proof.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod error;
mod login;

pub use error::ClientLoginError;
pub use login::ClientLogin;
