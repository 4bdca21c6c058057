//! # Aether Core Library
//!
//! This library provides the core logic for the Aether focus-interval timer.
//! The CLI binary is a thin host over the same library.
//!
//! ## Architecture
//!
//! - **Phase Engine**: A tick-driven state machine that alternates focus and
//!   break phases and describes its side effects as events
//! - **Effects**: Collaborator traits (stats, notifications, sound) and a
//!   best-effort dispatcher
//! - **Clock**: A tokio task that owns the engine and delivers one tick per
//!   second while it runs
//! - **Storage**: TOML-based preferences and SQLite daily statistics
//!
//! ## Key Components
//!
//! - [`PhaseEngine`]: Core timer state machine
//! - [`TimerDriver`]: Clock host serializing ticks and control commands
//! - [`Config`]: User preferences
//! - [`Database`]: Daily statistics sink

pub mod clock;
pub mod effects;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use clock::{Command, DriverHandle, TimerDriver};
pub use effects::{Effects, Notifier, Silent, SoundPlayer, StatsSink};
pub use error::{ConfigError, CoreError, DatabaseError, EffectError, ValidationError};
pub use events::{Event, NotificationKind, SoundCue};
pub use storage::{Config, Database, DayStats};
pub use timer::{Durations, EngineSnapshot, Phase, PhaseEngine, Preferences};
