//! Page navigation state for preview mode

use serde::Serialize;

/// Paging direction for the previous/next controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn offset(self) -> i64 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

/// Current page and page count of the loaded document.
///
/// Only exists while a document is loaded, and always satisfies
/// `1 <= current <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    current: u32,
    total: u32,
}

impl Navigation {
    /// Start at page 1. Returns `None` for an empty document.
    pub fn new(total: u32) -> Option<Self> {
        if total == 0 {
            return None;
        }
        Some(Self { current: 1, total })
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Target page for a step, or `None` when the step would leave the document
    pub fn step(&self, direction: Direction) -> Option<u32> {
        let target = self.current as i64 + direction.offset();
        if target >= 1 && target <= self.total as i64 {
            Some(target as u32)
        } else {
            None
        }
    }

    /// Move to `page` if it is in range
    pub fn go_to(&mut self, page: u32) -> bool {
        if page >= 1 && page <= self.total {
            self.current = page;
            true
        } else {
            false
        }
    }

    pub fn previous_enabled(&self) -> bool {
        self.current > 1
    }

    pub fn next_enabled(&self) -> bool {
        self.current < self.total
    }
}

/// Navigation-derived UI state: label text and control enablement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationView {
    pub label: String,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_document_has_no_navigation() {
        assert!(Navigation::new(0).is_none());
    }

    #[test]
    fn test_starts_at_first_page() {
        let nav = Navigation::new(3).unwrap();
        assert_eq!(nav.current(), 1);
        assert_eq!(nav.total(), 3);
        assert!(!nav.previous_enabled());
        assert!(nav.next_enabled());
    }

    #[test]
    fn test_single_page_disables_both_controls() {
        let nav = Navigation::new(1).unwrap();
        assert!(!nav.previous_enabled());
        assert!(!nav.next_enabled());
        assert_eq!(nav.step(Direction::Previous), None);
        assert_eq!(nav.step(Direction::Next), None);
    }

    #[test]
    fn test_go_to_rejects_out_of_range() {
        let mut nav = Navigation::new(4).unwrap();
        assert!(!nav.go_to(0));
        assert!(!nav.go_to(5));
        assert_eq!(nav.current(), 1);
        assert!(nav.go_to(4));
        assert_eq!(nav.current(), 4);
        assert!(!nav.next_enabled());
    }

    proptest! {
        #[test]
        fn prop_step_stays_in_bounds(total in 1u32..500, start in 1u32..500, forward in any::<bool>()) {
            let mut nav = Navigation::new(total).unwrap();
            nav.go_to(start.min(total));
            let direction = if forward { Direction::Next } else { Direction::Previous };
            if let Some(target) = nav.step(direction) {
                prop_assert!(target >= 1 && target <= total);
            }
        }

        #[test]
        fn prop_boundaries_block_steps(total in 1u32..500) {
            let mut nav = Navigation::new(total).unwrap();
            prop_assert_eq!(nav.step(Direction::Previous), None);
            nav.go_to(total);
            prop_assert_eq!(nav.step(Direction::Next), None);
        }

        #[test]
        fn prop_next_then_previous_round_trips(total in 3u32..500, start in 2u32..499) {
            prop_assume!(start < total);
            let mut nav = Navigation::new(total).unwrap();
            nav.go_to(start);
            let forward = nav.step(Direction::Next).unwrap();
            nav.go_to(forward);
            let back = nav.step(Direction::Previous).unwrap();
            nav.go_to(back);
            prop_assert_eq!(nav.current(), start);
        }

        #[test]
        fn prop_controls_match_position(total in 1u32..500, page in 1u32..500) {
            let mut nav = Navigation::new(total).unwrap();
            nav.go_to(page.min(total));
            prop_assert_eq!(nav.previous_enabled(), nav.current() != 1);
            prop_assert_eq!(nav.next_enabled(), nav.current() != total);
        }
    }
}
