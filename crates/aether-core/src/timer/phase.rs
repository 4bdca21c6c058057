use serde::{Deserialize, Serialize};

/// The interval type the engine is currently counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Length of each phase in seconds.
///
/// Values are stored as given; [`Durations::secs`] clamps anything below one
/// second so a running countdown always terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub focus_secs: i64,
    pub short_break_secs: i64,
    pub long_break_secs: i64,
}

impl Durations {
    pub fn from_minutes(focus: i64, short_break: i64, long_break: i64) -> Self {
        Self {
            focus_secs: focus.saturating_mul(60),
            short_break_secs: short_break.saturating_mul(60),
            long_break_secs: long_break.saturating_mul(60),
        }
    }

    /// Resolved duration of `phase`, never less than one second.
    pub fn secs(&self, phase: Phase) -> u64 {
        let raw = match phase {
            Phase::Focus => self.focus_secs,
            Phase::ShortBreak => self.short_break_secs,
            Phase::LongBreak => self.long_break_secs,
        };
        raw.max(1) as u64
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self::from_minutes(25, 5, 15)
    }
}

/// Read-only preference snapshot the engine consults on every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub durations: Durations,
    /// Completed focus sessions between long breaks.
    pub long_break_interval: u32,
    pub auto_start_focus: bool,
    pub auto_start_breaks: bool,
    pub sound_enabled: bool,
    pub tick_sound_enabled: bool,
    pub notifications_enabled: bool,
}

impl Preferences {
    pub fn long_break_interval(&self) -> u64 {
        u64::from(self.long_break_interval.max(1))
    }

    /// Whether the engine keeps running after entering `phase` on expiry.
    pub fn auto_starts(&self, phase: Phase) -> bool {
        if phase.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_focus
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            durations: Durations::default(),
            long_break_interval: 4,
            auto_start_focus: false,
            auto_start_breaks: false,
            sound_enabled: true,
            tick_sound_enabled: false,
            notifications_enabled: true,
        }
    }
}
