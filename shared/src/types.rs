use std::{collections::HashMap, fmt};

/// Flat string-keyed property bag exchanged during login.
/// Unknown keys are ignored by both sides.
pub type Properties = HashMap<String, String>;

// PeerId
/// Identity of a node taking part in the game, as seen by the dispatch layer
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
