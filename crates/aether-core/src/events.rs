use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Audio cue requested by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Start,
    Pause,
    Chime,
    /// Low-volume per-second tick.
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FocusComplete,
    BreakOver,
}

impl NotificationKind {
    pub fn title(self) -> &'static str {
        match self {
            NotificationKind::FocusComplete => "Focus complete",
            NotificationKind::BreakOver => "Break over",
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            NotificationKind::FocusComplete => "Nice work. Time to take a break.",
            NotificationKind::BreakOver => "Break is over. Ready to focus?",
        }
    }
}

/// Side effect emitted by the phase engine.
///
/// The engine only describes what should happen; hosts route events to
/// their collaborators (see [`crate::effects::Effects`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Sound {
        cue: SoundCue,
    },
    Notify {
        kind: NotificationKind,
    },
    /// One focus phase ran to completion.
    SessionCompleted,
    /// Focus minutes credited at focus expiry, rounded to the nearest minute.
    /// Never emitted with zero: a focus phase under 30 s reports only
    /// `SessionCompleted`.
    MinutesElapsed {
        minutes: u64,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        completed_focus_sessions: u64,
        /// Running flag after the auto-start policy was applied.
        running: bool,
    },
}
