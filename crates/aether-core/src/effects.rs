//! Side-effect collaborators and best-effort event dispatch.
//!
//! The engine emits [`Event`]s; [`Effects`] hands each one to the collaborator
//! that owns it. Collaborator failures are logged and dropped so they can
//! never stall the countdown.

use crate::error::EffectError;
use crate::events::{Event, NotificationKind, SoundCue};

/// Receives completed-session accounting. Owns day bucketing and persistence.
pub trait StatsSink: Send {
    fn session_completed(&mut self) -> Result<(), EffectError>;

    fn minutes_elapsed(&mut self, minutes: u64) -> Result<(), EffectError>;
}

pub trait Notifier: Send {
    fn notify(&mut self, kind: NotificationKind) -> Result<(), EffectError>;
}

pub trait SoundPlayer: Send {
    fn play(&mut self, cue: SoundCue) -> Result<(), EffectError>;
}

/// Collaborator that accepts everything and does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl StatsSink for Silent {
    fn session_completed(&mut self) -> Result<(), EffectError> {
        Ok(())
    }

    fn minutes_elapsed(&mut self, _minutes: u64) -> Result<(), EffectError> {
        Ok(())
    }
}

impl Notifier for Silent {
    fn notify(&mut self, _kind: NotificationKind) -> Result<(), EffectError> {
        Ok(())
    }
}

impl SoundPlayer for Silent {
    fn play(&mut self, _cue: SoundCue) -> Result<(), EffectError> {
        Ok(())
    }
}

/// Independently owned collaborators the engine's events are routed to.
pub struct Effects {
    stats: Box<dyn StatsSink>,
    notifier: Box<dyn Notifier>,
    sound: Box<dyn SoundPlayer>,
}

impl Effects {
    pub fn new(
        stats: Box<dyn StatsSink>,
        notifier: Box<dyn Notifier>,
        sound: Box<dyn SoundPlayer>,
    ) -> Self {
        Self {
            stats,
            notifier,
            sound,
        }
    }

    /// Route every event to its collaborator. Never fails.
    pub fn dispatch(&mut self, events: &[Event]) {
        for event in events {
            let result = match event {
                Event::Sound { cue } => self.sound.play(*cue),
                Event::Notify { kind } => self.notifier.notify(*kind),
                Event::SessionCompleted => self.stats.session_completed(),
                Event::MinutesElapsed { minutes } => self.stats.minutes_elapsed(*minutes),
                Event::PhaseChanged { from, to, .. } => {
                    tracing::info!(%from, %to, "phase changed");
                    Ok(())
                }
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, ?event, "side effect failed");
            }
        }
    }
}

impl Default for Effects {
    fn default() -> Self {
        Self::new(Box::new(Silent), Box::new(Silent), Box::new(Silent))
    }
}
