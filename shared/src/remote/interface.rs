use crate::{
    remote::{
        error::EndpointError,
        results::HandlerFault,
        value::{ArgType, RemoteValue},
    },
    PeerId,
};

// MethodSignature
/// A method a capability declares: its name and exact argument types
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: &'static str,
    pub arg_types: &'static [ArgType],
}

impl MethodSignature {
    pub const fn new(name: &'static str, arg_types: &'static [ArgType]) -> Self {
        Self { name, arg_types }
    }

    pub fn matches(&self, name: &str, arg_types: &[ArgType]) -> bool {
        self.name == name && self.arg_types == arg_types
    }
}

// RemoteInterface
/// Static description of a capability type: the table of methods that
/// handlers registered under it answer to.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RemoteInterface {
    pub name: &'static str,
    pub methods: &'static [MethodSignature],
}

impl RemoteInterface {
    pub const fn new(name: &'static str, methods: &'static [MethodSignature]) -> Self {
        Self { name, methods }
    }

    /// Finds the method matching `method_name` with exactly `arg_types`
    pub fn resolve(
        &'static self,
        method_name: &str,
        arg_types: &[ArgType],
    ) -> Result<&'static MethodSignature, EndpointError> {
        self.methods
            .iter()
            .find(|method| method.matches(method_name, arg_types))
            .ok_or_else(|| EndpointError::UnknownMethod {
                interface: self.name,
                method: method_name.to_string(),
                arg_types: arg_types
                    .iter()
                    .map(|arg_type| arg_type.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

// RemoteName
/// Name of a service together with the capability it is declared as
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RemoteName {
    name: String,
    interface: &'static RemoteInterface,
}

impl RemoteName {
    pub fn new(name: impl Into<String>, interface: &'static RemoteInterface) -> Self {
        Self {
            name: name.into(),
            interface,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interface(&self) -> &'static RemoteInterface {
        self.interface
    }
}

// MessageContext
/// Per-call context handed to a handler for the duration of one invocation
#[derive(Clone, Copy, Debug)]
pub struct MessageContext<'a> {
    sender: &'a PeerId,
}

impl<'a> MessageContext<'a> {
    pub fn new(sender: &'a PeerId) -> Self {
        Self { sender }
    }

    /// The peer the invocation originated from
    pub fn sender(&self) -> &'a PeerId {
        self.sender
    }
}

// RemoteHandler
/// A concrete implementation of a capability, registered on an endpoint.
///
/// `invoke` is only ever called with a `method` taken from
/// `self.interface().methods` and with `args` whose types match it.
pub trait RemoteHandler: Send + Sync {
    fn interface(&self) -> &'static RemoteInterface;

    fn invoke(
        &self,
        method: &MethodSignature,
        args: &[RemoteValue],
        context: &MessageContext<'_>,
    ) -> Result<RemoteValue, HandlerFault>;
}
