use thiserror::Error;

use skirmish_shared::AuthenticationError;

/// Errors answering a server's login challenge
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientLoginError {
    /// The server requires a password and none was given
    #[error("Server requires a password")]
    PasswordRequired,

    /// The challenge lacks the parameters of any proof scheme
    #[error("Unable to answer login challenge: {0}")]
    Authentication(#[from] AuthenticationError),
}
