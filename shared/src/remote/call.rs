use std::fmt;

use crate::remote::{
    error::EndpointError,
    interface::{MethodSignature, RemoteInterface},
    value::{ArgType, RemoteValue},
};

/// One invocation of a method on a named service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteMethodCall {
    service_name: String,
    method_name: String,
    args: Vec<RemoteValue>,
}

impl RemoteMethodCall {
    pub fn new(
        service_name: impl Into<String>,
        method_name: impl Into<String>,
        args: Vec<RemoteValue>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            method_name: method_name.into(),
            args,
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn args(&self) -> &[RemoteValue] {
        &self.args
    }

    pub fn arg_types(&self) -> Vec<ArgType> {
        self.args.iter().map(RemoteValue::arg_type).collect()
    }

    /// Resolves this call against a capability's method table
    pub fn resolve(
        &self,
        interface: &'static RemoteInterface,
    ) -> Result<&'static MethodSignature, EndpointError> {
        interface.resolve(&self.method_name, &self.arg_types())
    }
}

impl fmt::Display for RemoteMethodCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.service_name, self.method_name)?;
        for (index, arg_type) in self.arg_types().iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg_type)?;
        }
        f.write_str(")")
    }
}
