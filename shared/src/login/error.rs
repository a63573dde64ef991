use thiserror::Error;

/// Errors of the password proof schemes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    /// A property the scheme needs is absent
    #[error("Missing login property {key:?}")]
    MissingProperty { key: &'static str },

    /// A property is present but not valid base64
    #[error("Malformed login property {key:?}")]
    MalformedProperty { key: &'static str },

    /// The proof does not match the configured password
    #[error("Password proof does not match")]
    ProofMismatch,

    /// The system random number generator failed
    #[error("System random number generator is unavailable")]
    RandomUnavailable,
}

/// Errors parsing an [`EngineVersion`](crate::EngineVersion)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Version string is empty")]
    Empty,

    #[error("Invalid version {raw:?}: expected major.minor[.point[.micro]]")]
    Malformed { raw: String },
}
