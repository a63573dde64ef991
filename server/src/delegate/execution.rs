use std::{
    collections::HashSet,
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
    thread::{self, ThreadId},
    time::Duration,
};

use log::{debug, info};

use crate::delegate::error::DelegateError;

struct ExecutionState {
    executing: HashSet<ThreadId>,
    blocked: bool,
    game_over: bool,
}

/// Tracks which threads are running delegate code, so the game can be
/// paused (e.g. to save) only between delegate steps, and so threads
/// stepping out to the network do not hold their slot while they wait.
pub struct DelegateExecutionManager {
    state: Mutex<ExecutionState>,
    changed: Condvar,
}

impl DelegateExecutionManager {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ExecutionState {
                executing: HashSet::new(),
                blocked: false,
                game_over: false,
            }),
            changed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ExecutionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a slot for the current thread, waiting while execution is
    /// blocked
    pub fn enter_delegate_execution(&self) -> Result<(), DelegateError> {
        let current = thread::current().id();
        let mut state = self.lock();
        loop {
            if state.game_over {
                return Err(DelegateError::GameOver);
            }
            if state.executing.contains(&current) {
                return Err(DelegateError::AlreadyExecuting);
            }
            if !state.blocked {
                break;
            }
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.executing.insert(current);
        Ok(())
    }

    pub fn leave_delegate_execution(&self) -> Result<(), DelegateError> {
        let current = thread::current().id();
        let mut state = self.lock();
        if !state.executing.remove(&current) {
            return Err(DelegateError::NotExecuting);
        }
        self.changed.notify_all();
        Ok(())
    }

    /// Waits up to `timeout` for every running delegate to step out, then
    /// keeps new ones from entering. Returns whether execution is blocked.
    pub fn block_delegate_execution(&self, timeout: Duration) -> bool {
        let mut state = self.lock();
        if state.blocked {
            return false;
        }
        state.blocked = true;

        let (mut state, wait) = self
            .changed
            .wait_timeout_while(state, timeout, |state| !state.executing.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        if wait.timed_out() && !state.executing.is_empty() {
            debug!(
                "Could not block delegate execution, {} threads still executing",
                state.executing.len()
            );
            state.blocked = false;
            self.changed.notify_all();
            return false;
        }
        info!("Delegate execution blocked");
        true
    }

    pub fn resume_delegate_execution(&self) {
        let mut state = self.lock();
        if state.blocked {
            state.blocked = false;
            info!("Delegate execution resumed");
        }
        self.changed.notify_all();
    }

    /// Ends the game: waiting and future entries fail with `GameOver`
    pub fn set_game_over(&self) {
        let mut state = self.lock();
        state.game_over = true;
        state.blocked = false;
        self.changed.notify_all();
    }

    pub fn is_game_over(&self) -> bool {
        self.lock().game_over
    }

    pub fn is_current_thread_executing(&self) -> bool {
        self.lock().executing.contains(&thread::current().id())
    }

    /// Runs `f`, a call leaving this node, outside the current thread's
    /// delegate slot if it holds one
    pub fn run_outbound<R>(&self, f: impl FnOnce() -> R) -> Result<R, DelegateError> {
        if !self.is_current_thread_executing() {
            return Ok(f());
        }
        self.leave_delegate_execution()?;
        let result = {
            let _restore = RestoreOnUnwind::new(self, true);
            f()
        };
        self.enter_delegate_execution()?;
        Ok(result)
    }

    /// Runs `f`, a call arriving into delegate code, inside a delegate slot
    pub fn run_inbound<R>(&self, f: impl FnOnce() -> R) -> Result<R, DelegateError> {
        self.enter_delegate_execution()?;
        let result = {
            let _restore = RestoreOnUnwind::new(self, false);
            f()
        };
        self.leave_delegate_execution()?;
        Ok(result)
    }
}

// RestoreOnUnwind
/// Puts the current thread's slot back the way it was before a guarded
/// call, if that call panics
struct RestoreOnUnwind<'a> {
    manager: &'a DelegateExecutionManager,
    held_slot: bool,
}

impl<'a> RestoreOnUnwind<'a> {
    fn new(manager: &'a DelegateExecutionManager, held_slot: bool) -> Self {
        Self { manager, held_slot }
    }
}

impl Drop for RestoreOnUnwind<'_> {
    fn drop(&mut self) {
        if !thread::panicking() {
            return;
        }
        let current = thread::current().id();
        let mut state = self.manager.lock();
        if self.held_slot {
            state.executing.insert(current);
        } else {
            state.executing.remove(&current);
        }
        self.manager.changed.notify_all();
    }
}

impl Default for DelegateExecutionManager {
    fn default() -> Self {
        Self::new()
    }
}
