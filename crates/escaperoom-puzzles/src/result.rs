use std::fmt;

use escaperoom_core::PinId;
use escaperoom_hardware::KeypadInput;
use serde::{Deserialize, Serialize};

/// Outcome of a puzzle.
///
/// `Success` and `Failure` are terminal: sensor changes are ignored until a
/// reset brings the puzzle back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PuzzleResult {
    #[default]
    Pending,
    Success,
    Failure,
}

impl PuzzleResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for PuzzleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// Everything a puzzle reacts to.
///
/// Each puzzle ignores the events that do not concern it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PuzzleEvent {
    /// An input line changed (possibly a duplicate or bounce).
    InputChanged(PinId),

    /// A key was pressed.
    Key(KeypadInput),

    /// The gate in front of this puzzle opened or closed.
    SetEnabled(bool),

    /// Show control asked for a reset.
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!PuzzleResult::Pending.is_terminal());
        assert!(PuzzleResult::Success.is_terminal());
        assert!(PuzzleResult::Failure.is_terminal());
        assert_eq!(PuzzleResult::default(), PuzzleResult::Pending);
    }
}
