use std::{
    collections::HashMap,
    fmt,
    sync::{Mutex, PoisonError},
};

use crate::delegate::change::Change;

// PlayerId
/// Name of a player in the game (not of a network peer)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

// GameStep
/// The turn step a delegate runs in
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameStep {
    name: String,
    display_name: String,
    player: Option<PlayerId>,
    properties: HashMap<String, String>,
}

impl GameStep {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            player: None,
            properties: HashMap::new(),
        }
    }

    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn player(&self) -> Option<&PlayerId> {
        self.player.as_ref()
    }

    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }
}

/// The game session a delegate mutates
pub trait GameSession: Send + Sync {
    /// Publishes `change` to every observer of the game state
    fn add_change(&self, change: Change);
    fn is_game_over(&self) -> bool;
    /// Stops the step sequence once the current step ends
    fn stop_game_sequence(&self);
}

// ChangeLog
/// Append-only record of published changes
#[derive(Default)]
pub struct ChangeLog {
    changes: Mutex<Vec<Change>>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, change: Change) {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(change);
    }

    pub fn changes(&self) -> Vec<Change> {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Audit trail of the game, written by delegates
pub trait HistoryWriter: Send + Sync {
    /// Opens a new event; children attach to the latest event
    fn start_event(&self, description: &str);
    fn add_child_to_event(&self, description: &str);
}

// HistoryEvent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEvent {
    pub description: String,
    pub children: Vec<String>,
}

// HistoryLog
/// In-memory [`HistoryWriter`]
#[derive(Default)]
pub struct HistoryLog {
    events: Mutex<Vec<HistoryEvent>>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HistoryEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HistoryWriter for HistoryLog {
    fn start_event(&self, description: &str) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(HistoryEvent {
                description: description.to_string(),
                children: Vec::new(),
            });
    }

    fn add_child_to_event(&self, description: &str) {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        match events.last_mut() {
            Some(event) => event.children.push(description.to_string()),
            None => events.push(HistoryEvent {
                description: description.to_string(),
                children: Vec::new(),
            }),
        }
    }
}
