use std::fmt;

/// Outcome of handling one resource reference
///
/// Every state is terminal; a resource is never revisited within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    /// Bytes fetched and written to the image directory
    Downloaded,

    /// Address already handled earlier in this run
    SkippedDuplicate,

    /// Derived local file already present; no request issued
    SkippedExisting,

    /// Fetch or write failed
    Failed,
}

impl ResourceState {
    /// Returns true if a network request was issued for this outcome
    pub fn was_fetched(&self) -> bool {
        matches!(self, Self::Downloaded | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Downloaded => "downloaded",
            Self::SkippedDuplicate => "skipped_duplicate",
            Self::SkippedExisting => "skipped_existing",
            Self::Failed => "failed",
        }
    }

    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Downloaded,
            Self::SkippedDuplicate,
            Self::SkippedExisting,
            Self::Failed,
        ]
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_was_fetched() {
        assert!(ResourceState::Downloaded.was_fetched());
        assert!(ResourceState::Failed.was_fetched());
        assert!(!ResourceState::SkippedDuplicate.was_fetched());
        assert!(!ResourceState::SkippedExisting.was_fetched());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ResourceState::SkippedExisting), "skipped_existing");
    }
}
