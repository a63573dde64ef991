use thiserror::Error;

use skirmish_shared::{MessengerError, RemoteValue};

use crate::delegate::random::RandomSourceError;

/// Errors raised to rule-execution code through the [`DelegateBridge`]
///
/// [`DelegateBridge`]: crate::DelegateBridge
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelegateError {
    /// The game session has ended; the running delegate must stop
    #[error("Game is over")]
    GameOver,

    /// A random request with a zero upper bound or zero count
    #[error("Invalid random request: max {max} must be positive and count {count} at least 1")]
    InvalidRandomRequest { max: u32, count: usize },

    /// The random source returned the wrong number of values
    #[error("Random source returned {received} values, {expected} were requested")]
    RandomCountMismatch { expected: usize, received: usize },

    /// The random source returned a value outside `[0, max)`
    #[error("Random source returned {value}, outside of [0, {max})")]
    RandomOutOfRange { value: u32, max: u32 },

    /// The random source itself failed
    #[error("Random source failed: {0}")]
    RandomSource(String),

    /// A player-bound call was made in a step without a player
    #[error("Step {step:?} has no player")]
    NoPlayer { step: String },

    /// The current thread already holds a delegate execution slot
    #[error("Current thread is already executing a delegate")]
    AlreadyExecuting,

    /// The current thread does not hold a delegate execution slot
    #[error("Current thread is not executing a delegate")]
    NotExecuting,

    /// A remote player answered with a value the method cannot return
    #[error("Remote player answered {method} with unexpected {reply:?}")]
    UnexpectedReply { method: String, reply: RemoteValue },

    /// A remote call failed without ending the game
    #[error("Remote call failed: {0}")]
    Messenger(MessengerError),
}

impl From<MessengerError> for DelegateError {
    fn from(error: MessengerError) -> Self {
        if error.ends_session() {
            DelegateError::GameOver
        } else {
            DelegateError::Messenger(error)
        }
    }
}

impl From<RandomSourceError> for DelegateError {
    fn from(error: RandomSourceError) -> Self {
        match error {
            RandomSourceError::Messenger(error) => error.into(),
            RandomSourceError::Failed(reason) => DelegateError::RandomSource(reason),
        }
    }
}
