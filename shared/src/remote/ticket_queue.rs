use std::sync::{
    atomic::{AtomicU64, Ordering},
    Condvar, Mutex, PoisonError,
};

// Ticket
/// Place in line for a single-threaded endpoint, like the number you pull
/// at a bank counter
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn number(&self) -> u64 {
        self.0
    }
}

// TicketQueue
/// Issues strictly increasing tickets and lets their holders run one at a
/// time, in the order the tickets were issued.
///
/// Issuing is lock-free. Releasing goes through a monitor: every release
/// wakes all waiters and each re-checks whether its number came up.
pub struct TicketQueue {
    next_ticket: AtomicU64,
    released: Mutex<u64>,
    turn_changed: Condvar,
}

impl TicketQueue {
    pub fn new() -> Self {
        Self {
            next_ticket: AtomicU64::new(0),
            released: Mutex::new(0),
            turn_changed: Condvar::new(),
        }
    }

    /// Allocates the next ticket. Never blocks.
    pub fn take(&self) -> Ticket {
        Ticket(self.next_ticket.fetch_add(1, Ordering::SeqCst))
    }

    /// Blocks until every ticket issued before `ticket` has been released.
    ///
    /// A waiter never gives up its place: a poisoned monitor is recovered
    /// and the wait continues, since abandoning a ticket would stall every
    /// ticket issued after it.
    pub fn wait_for_turn(&self, ticket: Ticket) {
        let mut released = self
            .released
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while ticket.0 > *released {
            released = self
                .turn_changed
                .wait(released)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Lets the next ticket in line run
    pub fn release(&self) {
        let mut released = self
            .released
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *released += 1;
        self.turn_changed.notify_all();
    }

    /// Number of tickets released so far
    pub fn released(&self) -> u64 {
        *self
            .released
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of tickets issued so far
    pub fn issued(&self) -> u64 {
        self.next_ticket.load(Ordering::SeqCst)
    }
}

impl Default for TicketQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ReleaseOnDrop
/// Releases one ticket when dropped, whichever way the holder's scope ends
pub(crate) struct ReleaseOnDrop<'q> {
    queue: &'q TicketQueue,
}

impl<'q> ReleaseOnDrop<'q> {
    pub(crate) fn new(queue: &'q TicketQueue) -> Self {
        Self { queue }
    }
}

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        self.queue.release();
    }
}
