//! Request-sequence tokens for last-intent-wins rendering.
//!
//! Every intent that writes the panel takes a [`Ticket`]. A fetch result may
//! only be painted if its ticket is still the latest one issued.

use std::sync::atomic::{AtomicU64, Ordering};

/// Handle for one issued intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic ticket issuer, one per panel.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket newer than every ticket issued before it.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if no ticket was issued after `ticket`.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn newest_ticket_wins() {
        let seq = RequestSequence::new();
        let first = seq.issue();
        assert!(seq.is_latest(first));

        let second = seq.issue();
        assert!(second > first);
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }

    #[test]
    fn tickets_are_unique_across_threads() {
        let seq = Arc::new(RequestSequence::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let seq = Arc::clone(&seq);
                thread::spawn(move || (0..100).map(|_| seq.issue().value()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 800);
        assert!(seq.is_latest(Ticket(800)));
    }
}
