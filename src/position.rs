//! Sibling ordering values.
//!
//! Planka orders boards, lists and cards by an integer `position`. New
//! siblings are appended with a wide gap so that other tools can later
//! place rows between two existing ones without renumbering.

/// Distance between two positions assigned by this tool.
pub const POSITION_GAP: i64 = 65535;

/// Position for a new sibling appended after `prior_max`.
///
/// An empty scope starts at 0.
pub fn next_position(prior_max: Option<i64>) -> i64 {
    match prior_max {
        Some(max) => max + POSITION_GAP,
        None => 0,
    }
}

/// Running position counter used when building a fresh project tree.
///
/// Each call advances the counter by `index * POSITION_GAP` and returns the
/// new value. The counter is shared by every sibling group of one entity
/// kind, so it grows across groups instead of restarting per parent, and the
/// step widens with the local index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningPosition {
    base: i64,
}

impl RunningPosition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance for the sibling at `index` within its parent.
    pub fn advance(&mut self, index: usize) -> i64 {
        self.base += index as i64 * POSITION_GAP;
        self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sibling_starts_at_zero() {
        assert_eq!(next_position(None), 0);
    }

    #[test]
    fn test_next_sibling_adds_gap() {
        assert_eq!(next_position(Some(0)), 65535);
        assert_eq!(next_position(Some(65535)), 131070);
        assert_eq!(next_position(Some(7)), 7 + POSITION_GAP);
    }

    #[test]
    fn test_running_position_sequence() {
        let mut pos = RunningPosition::new();
        assert_eq!(pos.advance(0), 0);
        assert_eq!(pos.advance(1), 65535);
        assert_eq!(pos.advance(2), 196605);
        // A new parent restarts the index but not the counter.
        assert_eq!(pos.advance(0), 196605);
    }
}
