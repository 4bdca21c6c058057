//! Phase engine implementation.
//!
//! The engine is a tick-driven state machine. It does not read the wall clock
//! and owns no threads - the caller delivers one `tick()` per elapsed second
//! while the engine is running.
//!
//! ## Phase Transitions
//!
//! ```text
//! Focus -> ShortBreak -> Focus -> ... -> Focus -> LongBreak -> Focus
//! ```
//!
//! Every command returns the side-effect events it produced. The engine never
//! performs I/O itself, so a slow or failing collaborator cannot stall it.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PhaseEngine::new(Preferences::default());
//! effects.dispatch(&engine.start());
//! // Once per second:
//! effects.dispatch(&engine.tick());
//! ```

use serde::{Deserialize, Serialize};

use super::phase::{Phase, Preferences};
use crate::events::{Event, NotificationKind, SoundCue};

/// Point-in-time view of the engine, for status output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub phase: Phase,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub running: bool,
    pub completed_focus_sessions: u64,
    pub progress: f64,
}

/// Core focus/break state machine.
#[derive(Debug, Clone)]
pub struct PhaseEngine {
    prefs: Preferences,
    phase: Phase,
    remaining_secs: u64,
    running: bool,
    completed_focus_sessions: u64,
}

impl PhaseEngine {
    /// Create an engine paused at the start of a focus phase.
    pub fn new(prefs: Preferences) -> Self {
        let remaining_secs = prefs.durations.secs(Phase::Focus);
        Self {
            prefs,
            phase: Phase::Focus,
            remaining_secs,
            running: false,
            completed_focus_sessions: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_focus_sessions(&self) -> u64 {
        self.completed_focus_sessions
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn duration(&self, phase: Phase) -> u64 {
        self.prefs.durations.secs(phase)
    }

    /// 0.0 .. 1.0 progress within the active phase.
    pub fn progress(&self) -> f64 {
        let total = self.duration(self.phase);
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            total_secs: self.duration(self.phase),
            running: self.running,
            completed_focus_sessions: self.completed_focus_sessions,
            progress: self.progress(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        if self.running || self.remaining_secs == 0 {
            return Vec::new();
        }
        self.running = true;
        self.sound(SoundCue::Start).into_iter().collect()
    }

    pub fn pause(&mut self) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        self.running = false;
        self.sound(SoundCue::Pause).into_iter().collect()
    }

    /// Stop and rewind the active phase. Phase and session count are kept.
    pub fn reset(&mut self) -> Vec<Event> {
        self.running = false;
        self.remaining_secs = self.duration(self.phase);
        Vec::new()
    }

    /// Jump straight into a fresh, running focus phase.
    ///
    /// A manual switch never counts as a completed session.
    pub fn start_focus(&mut self) -> Vec<Event> {
        self.phase = Phase::Focus;
        self.remaining_secs = self.duration(Phase::Focus);
        self.running = true;
        self.sound(SoundCue::Start).into_iter().collect()
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        if self.remaining_secs <= 1 {
            self.remaining_secs = 0;
            return self.advance();
        }
        self.remaining_secs -= 1;
        if self.prefs.tick_sound_enabled {
            vec![Event::Sound {
                cue: SoundCue::Tick,
            }]
        } else {
            Vec::new()
        }
    }

    /// Swap in a new preference snapshot.
    ///
    /// Any duration edit restarts the active phase's countdown at its new full
    /// length, whether or not the engine is running. Elapsed progress is not
    /// carried over.
    pub fn apply_preference_change(&mut self, prefs: Preferences) -> Vec<Event> {
        let durations_changed = prefs.durations != self.prefs.durations;
        self.prefs = prefs;
        if durations_changed {
            self.remaining_secs = self.duration(self.phase);
            tracing::debug!(
                phase = %self.phase,
                remaining_secs = self.remaining_secs,
                "durations changed, countdown re-derived"
            );
        }
        Vec::new()
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Natural expiry of the active phase. Expects `remaining_secs == 0`.
    fn advance(&mut self) -> Vec<Event> {
        let from = self.phase;
        let mut events = Vec::new();

        let next = match from {
            Phase::Focus => {
                self.completed_focus_sessions += 1;
                events.push(Event::SessionCompleted);
                let elapsed = self.duration(Phase::Focus).saturating_sub(self.remaining_secs);
                let minutes = (elapsed + 30) / 60;
                if minutes > 0 {
                    events.push(Event::MinutesElapsed { minutes });
                }
                if self.completed_focus_sessions % self.prefs.long_break_interval() == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Focus,
        };

        self.phase = next;
        self.remaining_secs = self.duration(next);
        self.running = self.prefs.auto_starts(next);

        events.extend(self.sound(SoundCue::Chime));
        if self.prefs.notifications_enabled {
            let kind = match from {
                Phase::Focus => NotificationKind::FocusComplete,
                _ => NotificationKind::BreakOver,
            };
            events.push(Event::Notify { kind });
        }
        events.push(Event::PhaseChanged {
            from,
            to: next,
            completed_focus_sessions: self.completed_focus_sessions,
            running: self.running,
        });

        tracing::debug!(
            %from,
            to = %next,
            sessions = self.completed_focus_sessions,
            running = self.running,
            "phase advanced"
        );
        events
    }

    fn sound(&self, cue: SoundCue) -> Option<Event> {
        self.prefs.sound_enabled.then_some(Event::Sound { cue })
    }
}

impl Default for PhaseEngine {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Durations;

    fn short_prefs() -> Preferences {
        Preferences {
            durations: Durations {
                focus_secs: 3,
                short_break_secs: 2,
                long_break_secs: 4,
            },
            ..Preferences::default()
        }
    }

    fn run_out(engine: &mut PhaseEngine) -> Vec<Event> {
        engine.start();
        let mut last = Vec::new();
        for _ in 0..engine.remaining_secs() {
            last = engine.tick();
        }
        last
    }

    #[test]
    fn new_engine_is_paused_in_focus() {
        let engine = PhaseEngine::default();
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 25 * 60);
        assert!(!engine.is_running());
        assert_eq!(engine.completed_focus_sessions(), 0);
    }

    #[test]
    fn start_pause_are_idempotent() {
        let mut engine = PhaseEngine::default();
        assert_eq!(
            engine.start(),
            vec![Event::Sound {
                cue: SoundCue::Start
            }]
        );
        assert!(engine.is_running());
        assert!(engine.start().is_empty());
        assert!(engine.is_running());

        assert_eq!(
            engine.pause(),
            vec![Event::Sound {
                cue: SoundCue::Pause
            }]
        );
        assert!(!engine.is_running());
        assert!(engine.pause().is_empty());
        assert!(!engine.is_running());
    }

    #[test]
    fn sound_disabled_suppresses_start_and_chime() {
        let mut engine = PhaseEngine::new(Preferences {
            sound_enabled: false,
            ..short_prefs()
        });
        assert!(engine.start().is_empty());
        let events = run_out(&mut engine);
        assert!(!events.iter().any(|e| matches!(e, Event::Sound { .. })));
    }

    #[test]
    fn tick_is_ignored_while_paused() {
        let mut engine = PhaseEngine::new(short_prefs());
        assert!(engine.tick().is_empty());
        assert_eq!(engine.remaining_secs(), 3);
    }

    #[test]
    fn tick_counts_down_and_emits_tick_sound_when_enabled() {
        let mut engine = PhaseEngine::new(Preferences {
            tick_sound_enabled: true,
            ..short_prefs()
        });
        engine.start();
        assert_eq!(
            engine.tick(),
            vec![Event::Sound {
                cue: SoundCue::Tick
            }]
        );
        assert_eq!(engine.remaining_secs(), 2);
    }

    #[test]
    fn focus_expiry_reports_session_and_minutes() {
        let mut engine = PhaseEngine::default();
        let events = run_out(&mut engine);
        assert_eq!(
            events,
            vec![
                Event::SessionCompleted,
                Event::MinutesElapsed { minutes: 25 },
                Event::Sound {
                    cue: SoundCue::Chime
                },
                Event::Notify {
                    kind: NotificationKind::FocusComplete
                },
                Event::PhaseChanged {
                    from: Phase::Focus,
                    to: Phase::ShortBreak,
                    completed_focus_sessions: 1,
                    running: false,
                },
            ]
        );
        assert_eq!(engine.remaining_secs(), 5 * 60);
    }

    #[test]
    fn break_expiry_notifies_break_over() {
        let mut engine = PhaseEngine::new(short_prefs());
        run_out(&mut engine);
        let events = run_out(&mut engine);
        assert!(events.contains(&Event::Notify {
            kind: NotificationKind::BreakOver
        }));
        assert!(!events.contains(&Event::SessionCompleted));
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.completed_focus_sessions(), 1);
    }

    #[test]
    fn notifications_disabled_suppresses_notify() {
        let mut engine = PhaseEngine::new(Preferences {
            notifications_enabled: false,
            ..short_prefs()
        });
        let events = run_out(&mut engine);
        assert!(!events.iter().any(|e| matches!(e, Event::Notify { .. })));
    }

    #[test]
    fn sub_half_minute_focus_reports_no_minutes() {
        let mut engine = PhaseEngine::new(short_prefs());
        let events = run_out(&mut engine);
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::MinutesElapsed { .. })));
        assert!(events.contains(&Event::SessionCompleted));
    }

    #[test]
    fn reset_keeps_phase_and_count() {
        let mut engine = PhaseEngine::new(short_prefs());
        run_out(&mut engine);
        engine.start();
        engine.tick();
        assert!(engine.reset().is_empty());
        assert_eq!(engine.phase(), Phase::ShortBreak);
        assert_eq!(engine.remaining_secs(), 2);
        assert_eq!(engine.completed_focus_sessions(), 1);
        assert!(!engine.is_running());
    }

    #[test]
    fn start_focus_switches_without_counting() {
        let mut engine = PhaseEngine::new(short_prefs());
        run_out(&mut engine);
        assert_eq!(engine.phase(), Phase::ShortBreak);

        let events = engine.start_focus();
        assert_eq!(
            events,
            vec![Event::Sound {
                cue: SoundCue::Start
            }]
        );
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 3);
        assert!(engine.is_running());
        assert_eq!(engine.completed_focus_sessions(), 1);
    }

    #[test]
    fn toggle_only_change_keeps_remaining() {
        let mut engine = PhaseEngine::default();
        engine.start();
        engine.tick();
        let prefs = Preferences {
            tick_sound_enabled: true,
            ..engine.preferences().clone()
        };
        engine.apply_preference_change(prefs);
        assert_eq!(engine.remaining_secs(), 25 * 60 - 1);
        assert!(engine.is_running());
    }

    #[test]
    fn progress_tracks_countdown() {
        let mut engine = PhaseEngine::new(Preferences {
            durations: Durations {
                focus_secs: 4,
                short_break_secs: 1,
                long_break_secs: 1,
            },
            ..Preferences::default()
        });
        assert_eq!(engine.progress(), 0.0);
        engine.start();
        engine.tick();
        assert_eq!(engine.progress(), 0.25);
        assert_eq!(engine.snapshot().total_secs, 4);
    }

    #[test]
    fn custom_long_break_interval() {
        let mut engine = PhaseEngine::new(Preferences {
            long_break_interval: 2,
            ..short_prefs()
        });
        run_out(&mut engine);
        assert_eq!(engine.phase(), Phase::ShortBreak);
        run_out(&mut engine);
        run_out(&mut engine);
        assert_eq!(engine.phase(), Phase::LongBreak);
    }
}
