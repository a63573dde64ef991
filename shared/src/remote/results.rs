use thiserror::Error;

use crate::remote::value::RemoteValue;

/// Failure raised by a handler while executing an invocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerFault {
    /// The handler returned an error
    #[error("{0}")]
    Failed(String),

    /// The handler panicked; the panic was contained to this invocation
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerFault {
    pub fn new(message: impl Into<String>) -> Self {
        HandlerFault::Failed(message.into())
    }
}

/// Outcome of one invocation on one handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    Returned(RemoteValue),
    Fault(HandlerFault),
}

impl InvocationResult {
    pub fn is_fault(&self) -> bool {
        matches!(self, InvocationResult::Fault(_))
    }

    pub fn value(&self) -> Option<&RemoteValue> {
        match self {
            InvocationResult::Returned(value) => Some(value),
            InvocationResult::Fault(_) => None,
        }
    }

    pub fn fault(&self) -> Option<&HandlerFault> {
        match self {
            InvocationResult::Returned(_) => None,
            InvocationResult::Fault(fault) => Some(fault),
        }
    }

    pub fn into_result(self) -> Result<RemoteValue, HandlerFault> {
        match self {
            InvocationResult::Returned(value) => Ok(value),
            InvocationResult::Fault(fault) => Err(fault),
        }
    }
}

impl From<Result<RemoteValue, HandlerFault>> for InvocationResult {
    fn from(result: Result<RemoteValue, HandlerFault>) -> Self {
        match result {
            Ok(value) => InvocationResult::Returned(value),
            Err(fault) => InvocationResult::Fault(fault),
        }
    }
}
