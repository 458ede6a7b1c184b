//! Generation counter for discarding superseded async work
//!
//! Every transition that invalidates outstanding renders advances the
//! generation. Suspended operations capture a [`Ticket`] before awaiting the
//! engine and check it when they resume; a stale ticket means the result
//! belongs to a view that no longer exists and must be dropped.
//!
//! # Example
//!
//! ```
//! use pdfpreview_core::Generation;
//!
//! let generation = Generation::new();
//! let ticket = generation.advance();
//! assert!(generation.is_current(ticket));
//!
//! // user loads another file while the render is suspended
//! generation.advance();
//! assert!(!generation.is_current(ticket));
//! ```

use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Single-threaded generation counter
#[derive(Debug, Default)]
pub struct Generation {
    current: Cell<u64>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate all outstanding tickets and issue a new one
    pub fn advance(&self) -> Ticket {
        let next = self.current.get().wrapping_add(1);
        self.current.set(next);
        Ticket(next)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.get() == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ticket_is_current() {
        let generation = Generation::new();
        let ticket = generation.advance();
        assert!(generation.is_current(ticket));
    }

    #[test]
    fn test_advance_invalidates_previous_tickets() {
        let generation = Generation::new();
        let first = generation.advance();
        let second = generation.advance();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn test_counters_are_independent() {
        let preview = Generation::new();
        let print = Generation::new();
        let ticket = preview.advance();
        print.advance();
        print.advance();
        assert!(preview.is_current(ticket));
    }
}
