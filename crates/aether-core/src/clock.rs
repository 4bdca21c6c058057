//! Tokio clock host for the phase engine.
//!
//! [`TimerDriver`] owns the engine and its collaborators in a single task.
//! Control commands arrive over an mpsc channel and ticks come from a 1 s
//! interval that is only polled while the engine is running, so commands and
//! ticks are serialized without locks.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::effects::Effects;
use crate::timer::{EngineSnapshot, PhaseEngine, Preferences};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    StartFocus,
    Apply(Preferences),
    Quit,
}

/// Caller side of a running [`TimerDriver`].
#[derive(Debug, Clone)]
pub struct DriverHandle {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<EngineSnapshot>,
}

impl DriverHandle {
    /// Queue a command. Returns `false` once the driver has stopped.
    pub async fn send(&self, command: Command) -> bool {
        self.commands.send(command).await.is_ok()
    }

    pub fn status(&self) -> EngineSnapshot {
        self.status.borrow().clone()
    }

    /// Receiver that yields a fresh snapshot after every engine change.
    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.status.clone()
    }
}

pub struct TimerDriver {
    engine: PhaseEngine,
    effects: Effects,
    period: Duration,
    commands: mpsc::Receiver<Command>,
    status: watch::Sender<EngineSnapshot>,
}

impl TimerDriver {
    pub fn new(engine: PhaseEngine, effects: Effects) -> (Self, DriverHandle) {
        Self::with_period(engine, effects, TICK_PERIOD)
    }

    pub fn with_period(
        engine: PhaseEngine,
        effects: Effects,
        period: Duration,
    ) -> (Self, DriverHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (status_tx, status_rx) = watch::channel(engine.snapshot());
        let driver = Self {
            engine,
            effects,
            period,
            commands: cmd_rx,
            status: status_tx,
        };
        let handle = DriverHandle {
            commands: cmd_tx,
            status: status_rx,
        };
        (driver, handle)
    }

    /// Drive the engine until `Quit` arrives or every handle is dropped.
    /// Returns the engine in its final state.
    pub async fn run(mut self) -> PhaseEngine {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick fires immediately; skip it.
        ticker.reset();

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    let was_running = self.engine.is_running();
                    let events = match command {
                        Command::Quit => break,
                        Command::Start => self.engine.start(),
                        Command::Pause => self.engine.pause(),
                        Command::Reset => self.engine.reset(),
                        Command::StartFocus => self.engine.start_focus(),
                        Command::Apply(prefs) => self.engine.apply_preference_change(prefs),
                    };
                    if !was_running && self.engine.is_running() {
                        ticker.reset();
                    }
                    self.effects.dispatch(&events);
                    self.publish();
                }
                _ = ticker.tick(), if self.engine.is_running() => {
                    let events = self.engine.tick();
                    self.effects.dispatch(&events);
                    self.publish();
                }
            }
        }

        tracing::debug!(
            sessions = self.engine.completed_focus_sessions(),
            "timer driver stopped"
        );
        self.engine
    }

    fn publish(&self) {
        // No receivers left is fine; the driver keeps running until told to quit.
        let _ = self.status.send(self.engine.snapshot());
    }
}
