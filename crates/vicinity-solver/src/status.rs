//! Search lifecycle status.

use std::fmt;

/// The lifecycle state of a [`Search`](crate::Search).
///
/// Transitions: `Idle → Initializing → Running → Terminating → Idle`, with
/// `Disposed` as the terminal state reached from `Idle` via
/// [`dispose`](crate::Search::dispose).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// Not running; `start()` is legal.
    Idle,
    /// Setting up a run: seeding the current solution, notifying listeners.
    Initializing,
    /// Executing search steps.
    Running,
    /// A stop was requested; the in-flight step completes before the search
    /// returns to `Idle`.
    Terminating,
    /// Disposed; no further operations are legal.
    Disposed,
}

impl SearchStatus {
    /// Returns `true` while a run is in progress.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SearchStatus::Initializing | SearchStatus::Running | SearchStatus::Terminating
        )
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchStatus::Idle => "idle",
            SearchStatus::Initializing => "initializing",
            SearchStatus::Running => "running",
            SearchStatus::Terminating => "terminating",
            SearchStatus::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_states() {
        assert!(!SearchStatus::Idle.is_active());
        assert!(SearchStatus::Initializing.is_active());
        assert!(SearchStatus::Running.is_active());
        assert!(SearchStatus::Terminating.is_active());
        assert!(!SearchStatus::Disposed.is_active());
    }
}
