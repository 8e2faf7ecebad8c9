//! Frame encoder session state machine

use std::fmt;

/// Lifecycle of one encoder session.
///
///   IDLE -> ACCUMULATING (first submit)
///   IDLE | ACCUMULATING -> FINALIZED (flush)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncoderState {
    #[default]
    Idle,
    Accumulating,
    Finalized,
}

impl EncoderState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Accumulating => "accumulating",
            Self::Finalized => "finalized",
        }
    }

    /// State after a block submission, or `None` once finalized
    pub const fn after_submit(self) -> Option<Self> {
        match self {
            Self::Idle | Self::Accumulating => Some(Self::Accumulating),
            Self::Finalized => None,
        }
    }

    /// State after flushing, or `None` when already flushed
    pub const fn after_flush(self) -> Option<Self> {
        match self {
            Self::Idle | Self::Accumulating => Some(Self::Finalized),
            Self::Finalized => None,
        }
    }
}

impl fmt::Display for EncoderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_moves_to_accumulating() {
        assert_eq!(EncoderState::Idle.after_submit(), Some(EncoderState::Accumulating));
        assert_eq!(
            EncoderState::Accumulating.after_submit(),
            Some(EncoderState::Accumulating)
        );
    }

    #[test]
    fn flush_finalizes_from_any_open_state() {
        assert_eq!(EncoderState::Idle.after_flush(), Some(EncoderState::Finalized));
        assert_eq!(
            EncoderState::Accumulating.after_flush(),
            Some(EncoderState::Finalized)
        );
    }

    #[test]
    fn finalized_rejects_everything() {
        assert_eq!(EncoderState::Finalized.after_submit(), None);
        assert_eq!(EncoderState::Finalized.after_flush(), None);
    }

    #[test]
    fn state_display() {
        assert_eq!(EncoderState::Accumulating.to_string(), "accumulating");
    }
}
