mod engine;
mod phase;

pub use engine::{EngineSnapshot, PhaseEngine};
pub use phase::{Durations, Phase, Preferences};
