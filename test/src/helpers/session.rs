use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use skirmish_server::{Change, ChangeLog, GameSession};

/// Game session that only records what delegates do to it
#[derive(Default)]
pub struct FakeGameSession {
    changes: ChangeLog,
    game_over: AtomicBool,
    sequence_stopped: AtomicBool,
}

impl FakeGameSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn changes(&self) -> Vec<Change> {
        self.changes.changes()
    }

    pub fn end_game(&self) {
        self.game_over.store(true, Ordering::SeqCst);
    }

    pub fn is_sequence_stopped(&self) -> bool {
        self.sequence_stopped.load(Ordering::SeqCst)
    }
}

impl GameSession for FakeGameSession {
    fn add_change(&self, change: Change) {
        self.changes.append(change);
    }

    fn is_game_over(&self) -> bool {
        self.game_over.load(Ordering::SeqCst)
    }

    fn stop_game_sequence(&self) {
        self.sequence_stopped.store(true, Ordering::SeqCst);
    }
}
