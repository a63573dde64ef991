use thiserror::Error;

use crate::remote::results::HandlerFault;

/// Errors raised by a [`ServiceEndpoint`](crate::ServiceEndpoint) or the
/// [`EndpointRegistry`](crate::EndpointRegistry)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// A handler was registered under a name declared with another capability
    #[error("Endpoint {endpoint:?} is declared as {expected}, cannot accept a {found} handler")]
    InterfaceMismatch {
        endpoint: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Attempted to remove a handler that is not currently registered
    #[error("Handler is not registered on endpoint {endpoint:?} ({registered} handlers registered)")]
    HandlerNotRegistered {
        endpoint: String,
        registered: usize,
    },

    /// Asked for the sole implementor of an endpoint that has zero or many
    #[error("Invalid implementor count for endpoint {endpoint:?}: expected exactly 1, have {count}")]
    InvalidImplementorCount {
        endpoint: String,
        count: usize,
    },

    /// The invocation does not match any method the capability declares
    #[error("{interface} declares no method {method}({arg_types})")]
    UnknownMethod {
        interface: &'static str,
        method: String,
        arg_types: String,
    },

    /// The handler list lock was poisoned by a panicking thread
    #[error("Handler list of endpoint {endpoint:?} is poisoned")]
    LockPoisoned {
        endpoint: String,
    },
}

/// Errors reported by a [`PeerTransport`](crate::PeerTransport)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection to the rest of the game is gone
    #[error("Connection to the game was lost")]
    ConnectionLost,

    /// A single peer could not be reached
    #[error("Could not deliver {service:?} to peer {peer}: {reason}")]
    DeliveryFailed {
        service: String,
        peer: String,
        reason: String,
    },
}

/// Errors surfaced by the [`RemoteMessenger`](crate::RemoteMessenger) and
/// the handles it resolves
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessengerError {
    /// No node of the game implements the requested remote
    #[error("No remote named {name:?} is registered on any node")]
    NoSuchRemote {
        name: String,
    },

    /// The transport lost its connection; the game session is over
    #[error("Connection lost while calling remote")]
    ConnectionLost,

    /// The single implementor of a remote failed while handling the call
    #[error("Remote {name:?} failed in {method}: {fault}")]
    RemoteFault {
        name: String,
        method: String,
        fault: HandlerFault,
    },

    /// A point-to-point call reached more than one implementor
    #[error("Remote {name:?} answered {method} from {count} implementors, expected 1")]
    AmbiguousResult {
        name: String,
        method: String,
        count: usize,
    },

    /// Endpoint error
    #[error("Endpoint error: {0}")]
    Endpoint(#[from] EndpointError),

    /// Transport error
    #[error("Transport error: {0}")]
    Transport(TransportError),
}

impl MessengerError {
    /// Whether this error means the game can no longer be played, as opposed
    /// to a fault of one particular call
    pub fn ends_session(&self) -> bool {
        matches!(
            self,
            MessengerError::NoSuchRemote { .. } | MessengerError::ConnectionLost
        )
    }
}

impl From<TransportError> for MessengerError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::ConnectionLost => MessengerError::ConnectionLost,
            other => MessengerError::Transport(other),
        }
    }
}
