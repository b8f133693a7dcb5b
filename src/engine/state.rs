// src/engine/state.rs

use std::fmt;

/// Where a [`Sequencer`](super::Sequencer) is in its run.
///
/// `Idle → Listing → (Spawning → Running → Decoding)* → Completed | Halted`.
/// `index` is the position of the current entry in the sorted list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceState {
    Idle,
    Listing,
    Spawning { index: usize },
    Running { index: usize, pid: Option<u32> },
    Decoding { index: usize },
    /// Every entry succeeded (or was printed).
    Completed,
    /// Stopped early; carries the status the run exits with.
    Halted(i32),
}

impl SequenceState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SequenceState::Completed | SequenceState::Halted(_))
    }
}

impl fmt::Display for SequenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceState::Idle => write!(f, "idle"),
            SequenceState::Listing => write!(f, "listing"),
            SequenceState::Spawning { index } => write!(f, "spawning #{index}"),
            SequenceState::Running { index, .. } => write!(f, "running #{index}"),
            SequenceState::Decoding { index } => write!(f, "decoding #{index}"),
            SequenceState::Completed => write!(f, "completed"),
            SequenceState::Halted(code) => write!(f, "halted ({code})"),
        }
    }
}
