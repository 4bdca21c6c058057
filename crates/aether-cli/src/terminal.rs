//! Terminal stand-ins for the sound and notification collaborators.

use std::io::Write;

use aether_core::{EffectError, NotificationKind, Notifier, SoundCue, SoundPlayer};

/// Rings the terminal bell for audible cues.
pub struct TerminalBell {
    volume: u32,
}

impl TerminalBell {
    pub fn new(volume: u32) -> Self {
        Self { volume }
    }
}

impl SoundPlayer for TerminalBell {
    fn play(&mut self, cue: SoundCue) -> Result<(), EffectError> {
        // A bell every second is unbearable; ticks only show up in the log.
        if self.volume == 0 || cue == SoundCue::Tick {
            tracing::trace!(?cue, "sound skipped");
            return Ok(());
        }
        let mut err = std::io::stderr();
        err.write_all(b"\x07")?;
        err.flush()?;
        Ok(())
    }
}

/// Prints a banner on stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, kind: NotificationKind) -> Result<(), EffectError> {
        tracing::info!(?kind, "notification");
        let mut err = std::io::stderr();
        writeln!(err, "\n>> {}: {}", kind.title(), kind.body())?;
        Ok(())
    }
}
