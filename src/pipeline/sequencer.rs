//! Stale-result guard for asynchronous inference requests.
//!
//! Every request takes a ticket from a [`RequestSequencer`]. When its result
//! arrives, [`RequestSequencer::accept`] hands it back only if no newer
//! request has been started since; late completions are dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

/// Identifies one request; tickets compare by issue order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing request tickets.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding every earlier ticket.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns true if `ticket` is the most recently issued one.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Passes `result` through if `ticket` is still current, else drops it.
    pub fn accept<T>(&self, ticket: RequestTicket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            debug!(
                "dropping stale result for request {} (latest is {})",
                ticket.0,
                self.latest.load(Ordering::Acquire)
            );
            None
        }
    }
}
