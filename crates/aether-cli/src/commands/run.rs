use std::io::Write;

use aether_core::{
    Command, Config, Database, Effects, EngineSnapshot, PhaseEngine, TimerDriver,
};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::terminal::{TerminalBell, TerminalNotifier};

const HELP: &str = "commands: [s]tart  [p]ause  [r]eset  [f]ocus now  [c]onfig reload  [q]uit";

#[derive(Args)]
pub struct RunArgs {
    /// Focus length in minutes for this run (not saved)
    #[arg(long)]
    pub focus: Option<i64>,
    /// Short break length in minutes for this run (not saved)
    #[arg(long)]
    pub short_break: Option<i64>,
    /// Long break length in minutes for this run (not saved)
    #[arg(long)]
    pub long_break: Option<i64>,
}

impl RunArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(m) = self.focus {
            config.timer.focus_minutes = m;
        }
        if let Some(m) = self.short_break {
            config.timer.short_break_minutes = m;
        }
        if let Some(m) = self.long_break {
            config.timer.long_break_minutes = m;
        }
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    args.apply(&mut config);
    config.validate()?;

    let effects = Effects::new(
        Box::new(Database::open()?),
        Box::new(TerminalNotifier),
        Box::new(TerminalBell::new(config.sound.volume)),
    );
    let engine = PhaseEngine::new(config.preferences());

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(session(engine, effects, args));
    // The stdin reader sits in a blocking thread; don't wait for it.
    runtime.shutdown_background();
    result
}

async fn session(
    engine: PhaseEngine,
    effects: Effects,
    args: RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (driver, handle) = TimerDriver::new(engine, effects);
    let task = tokio::spawn(driver.run());

    let mut status = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    render(&handle.status())?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match line.trim() {
                    "s" | "start" => Command::Start,
                    "p" | "pause" => Command::Pause,
                    "r" | "reset" => Command::Reset,
                    "f" | "focus" => Command::StartFocus,
                    "c" | "config" => {
                        let mut config = match Config::load() {
                            Ok(config) => config,
                            Err(e) => {
                                eprintln!("config not applied: {e}");
                                continue;
                            }
                        };
                        args.apply(&mut config);
                        if let Err(e) = config.validate() {
                            eprintln!("config not applied: {e}");
                            continue;
                        }
                        Command::Apply(config.preferences())
                    }
                    "q" | "quit" => break,
                    "" => continue,
                    other => {
                        eprintln!("unknown command '{other}'. {HELP}");
                        continue;
                    }
                };
                if !handle.send(command).await {
                    break;
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = status.borrow_and_update().clone();
                render(&snapshot)?;
            }
            _ = &mut ctrl_c => break,
        }
    }

    handle.send(Command::Quit).await;
    let engine = task.await?;
    println!(
        "\n{} focus session(s) completed",
        engine.completed_focus_sessions()
    );
    Ok(())
}

fn render(snapshot: &EngineSnapshot) -> std::io::Result<()> {
    let mut out = std::io::stdout();
    write!(
        out,
        "\r{:<12} {}  {:<7}  sessions: {}   ",
        snapshot.phase.label(),
        format_clock(snapshot.remaining_secs),
        if snapshot.running { "running" } else { "paused" },
        snapshot.completed_focus_sessions
    )?;
    out.flush()
}

/// `MM:SS`, minutes unbounded.
fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
