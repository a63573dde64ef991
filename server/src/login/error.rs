use std::net::SocketAddr;

use thiserror::Error;

use skirmish_shared::{AuthenticationError, EngineVersion};

use crate::login::handshake::HandshakeState;

/// Why a joining Client was turned away. The `Display` form is the message
/// shown to the Client.
///
/// Every ban reads the same, so a Client cannot tell which of its
/// identifiers got it banned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginRejection {
    /// Version absent, blank, oversized or unparseable
    #[error("Invalid version {}", .raw.as_deref().unwrap_or("(none)"))]
    InvalidVersion { raw: Option<String> },

    /// Client and server engine versions differ
    #[error("Client is using {client} but server requires version {server}")]
    VersionMismatch {
        client: EngineVersion,
        server: EngineVersion,
    },

    /// Name, address or fingerprint is banned
    #[error("The host has banned you from this game")]
    Banned,

    /// No machine fingerprint was sent
    #[error("Unable to obtain mac address")]
    MissingFingerprint,

    /// The machine fingerprint does not have the expected shape
    #[error("Invalid mac address")]
    InvalidFingerprint,

    /// The password proof is missing or wrong
    #[error("Invalid password")]
    InvalidPassword,
}

/// Errors of a login handshake other than a verdict on the Client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandshakeError {
    /// An event arrived in a state that does not accept it
    #[error("Handshake in state {state:?} cannot accept a {event}")]
    UnexpectedEvent {
        state: HandshakeState,
        event: &'static str,
    },

    /// A response arrived for an address that was never challenged
    #[error("No pending login handshake for {addr}")]
    NoPendingHandshake { addr: SocketAddr },

    /// The challenge could not be generated
    #[error("Failed to create login challenge: {0}")]
    Challenge(#[from] AuthenticationError),

    /// The Client was rejected
    #[error("Login rejected: {0}")]
    Rejected(#[from] LoginRejection),
}
