use std::fmt;

/// Type tag of a [`RemoteValue`], used to build method signatures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgType {
    Unit,
    Bool,
    Int,
    Text,
    Bytes,
    List,
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgType::Unit => "unit",
            ArgType::Bool => "bool",
            ArgType::Int => "int",
            ArgType::Text => "text",
            ArgType::Bytes => "bytes",
            ArgType::List => "list",
        };
        f.write_str(name)
    }
}

/// Argument or return value of a remote method.
///
/// Capabilities are restricted to this closed set of types so that an
/// invocation can be resolved against a method table without any runtime
/// type discovery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteValue {
    Unit,
    Bool(bool),
    Int(i64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<RemoteValue>),
}

impl RemoteValue {
    pub fn arg_type(&self) -> ArgType {
        match self {
            RemoteValue::Unit => ArgType::Unit,
            RemoteValue::Bool(_) => ArgType::Bool,
            RemoteValue::Int(_) => ArgType::Int,
            RemoteValue::Text(_) => ArgType::Text,
            RemoteValue::Bytes(_) => ArgType::Bytes,
            RemoteValue::List(_) => ArgType::List,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RemoteValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            RemoteValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RemoteValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RemoteValue]> {
        match self {
            RemoteValue::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<bool> for RemoteValue {
    fn from(value: bool) -> Self {
        RemoteValue::Bool(value)
    }
}

impl From<i64> for RemoteValue {
    fn from(value: i64) -> Self {
        RemoteValue::Int(value)
    }
}

impl From<&str> for RemoteValue {
    fn from(value: &str) -> Self {
        RemoteValue::Text(value.to_string())
    }
}

impl From<String> for RemoteValue {
    fn from(value: String) -> Self {
        RemoteValue::Text(value)
    }
}

impl From<Vec<u8>> for RemoteValue {
    fn from(value: Vec<u8>) -> Self {
        RemoteValue::Bytes(value)
    }
}

impl From<Vec<RemoteValue>> for RemoteValue {
    fn from(values: Vec<RemoteValue>) -> Self {
        RemoteValue::List(values)
    }
}
