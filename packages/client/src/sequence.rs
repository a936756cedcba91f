//! Request sequencing for overlapping submissions.
//!
//! Nothing stops a user from submitting the same form twice before the first
//! answer arrives, and answers may come back in either order. Each request gets
//! a [`Ticket`] when it is issued; when its response arrives the [`Sequencer`]
//! decides under its [`OrderingPolicy`] whether the response may still be applied.

use std::cell::Cell;

pub use api::OrderingPolicy;

/// Position of a request in issue order. Starts at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct Sequencer {
    policy: OrderingPolicy,
    issued: Cell<u64>,
    applied: Cell<u64>,
    floor: Cell<u64>,
}

impl Sequencer {
    pub fn new(policy: OrderingPolicy) -> Self {
        Self {
            policy,
            issued: Cell::new(0),
            applied: Cell::new(0),
            floor: Cell::new(0),
        }
    }

    pub fn policy(&self) -> OrderingPolicy {
        self.policy
    }

    /// Tag a request that is about to be sent.
    pub fn issue(&self) -> Ticket {
        let next = self.issued.get() + 1;
        self.issued.set(next);
        Ticket(next)
    }

    /// Decide whether the response for `ticket` may be applied, and record it if so.
    pub fn admit(&self, ticket: Ticket) -> bool {
        if ticket.0 <= self.floor.get() {
            return false;
        }
        match self.policy {
            OrderingPolicy::LatestResponse => {
                self.applied.set(self.applied.get().max(ticket.0));
                true
            }
            OrderingPolicy::LatestRequest => {
                if ticket.0 > self.applied.get() {
                    self.applied.set(ticket.0);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Like [`admit`](Self::admit), for a response reporting a change the
    /// server has already made. Newer responses never hide it; only
    /// [`invalidate`](Self::invalidate) does.
    pub fn admit_success(&self, ticket: Ticket) -> bool {
        if ticket.0 <= self.floor.get() {
            return false;
        }
        self.applied.set(self.applied.get().max(ticket.0));
        true
    }

    /// Discard every response to a request issued so far, under either policy.
    pub fn invalidate(&self) {
        self.floor.set(self.issued.get());
    }
}
