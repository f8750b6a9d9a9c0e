/// Page state definitions for tracking harvest progress
///
/// Lifecycle: `Unvisited → InProgress → {Persisted, Failed}`.
use std::fmt;

/// Represents the current state of a page in the harvest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page has been discovered but not yet fetched
    Unvisited,

    /// Page is marked visited and its fetch has been issued
    InProgress,

    // ===== Terminal States =====
    /// Markup was fetched and written to the html directory
    Persisted,

    /// Fetch or write failed; the page is not retried
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Persisted | Self::Failed)
    }

    /// Checks whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Unvisited, Self::InProgress)
                | (Self::InProgress, Self::Persisted)
                | (Self::InProgress, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unvisited => "unvisited",
            Self::InProgress => "in_progress",
            Self::Persisted => "persisted",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![Self::Unvisited, Self::InProgress, Self::Persisted, Self::Failed]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
