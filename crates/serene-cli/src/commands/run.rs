//! `serene run`: an interactive session in the terminal.

use std::io::{IsTerminal, Write};
use std::time::{Duration, Instant};

use clap::Args;
use serene_core::{
    Collaborators, Config, ControllerSettings, Event, IntervalTicker, SessionController,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::input::{help, Input};
use crate::prompt::TerminalPrompt;
use crate::render::TerminalSurface;

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Session length in minutes (defaults to session.default_duration_min;
    /// must lie within session.min_duration_min ..= session.max_duration_min)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub minutes: Option<u32>,
    /// Start counting down immediately
    #[arg(long)]
    pub autostart: bool,
    /// Exit once the session completes instead of waiting for the next one
    #[arg(long)]
    pub exit_on_complete: bool,
    /// Print every event as a JSON line
    #[arg(long)]
    pub json: bool,
    /// Override the tick interval in milliseconds
    #[arg(long, hide = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: Option<u64>,
}

struct Terminal {
    json: bool,
    interactive: bool,
}

impl Terminal {
    fn report(&self, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => self.line(&line),
                Err(e) => warn!("failed to encode event: {e}"),
            }
            return;
        }
        let text = match event {
            Event::SessionStarted { total_secs, .. } => {
                format!("started, {} minutes", total_secs / 60)
            }
            Event::SessionPaused { remaining_secs, .. } => {
                format!("paused with {} left", serene_core::session::format_clock(*remaining_secs))
            }
            Event::SessionResumed { .. } => "resumed".to_string(),
            Event::SessionReset { .. } => "reset".to_string(),
            Event::DurationChanged { minutes, .. } => {
                serene_core::session::format_duration_label(*minutes)
            }
            Event::SessionCompleted { .. } => "session complete".to_string(),
            Event::Ticked { .. } | Event::StateSnapshot { .. } => return,
        };
        self.line(&text);
    }

    /// Status text that is not an event. Kept off stdout in JSON mode.
    fn message(&self, text: &str) {
        if self.json {
            eprintln!("{text}");
        } else {
            self.line(text);
        }
    }

    fn line(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        if self.interactive {
            // Clear the status line first.
            let _ = write!(out, "\r\x1b[2K");
        }
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }

    fn draw(&self, surface: &TerminalSurface, controller: &SessionController) {
        if !self.interactive {
            return;
        }
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\r\x1b[2K{}", surface.frame(controller, Instant::now()));
        let _ = out.flush();
    }
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let minutes_range = config.duration_range();
    let mut settings = ControllerSettings::from(&config);
    if let Some(minutes) = args.minutes {
        anyhow::ensure!(
            minutes_range.contains(&minutes),
            "--minutes {minutes} is outside {}..={}",
            minutes_range.start(),
            minutes_range.end()
        );
        settings.default_minutes = minutes;
    }
    if let Some(ms) = args.tick_ms {
        settings.tick_interval = Duration::from_millis(ms);
    }

    let (ticker, mut ticks) = IntervalTicker::new()?;
    let surface = TerminalSurface::new();
    let prompt = TerminalPrompt::new(args.json);
    let mut controller = SessionController::new(
        settings,
        Collaborators {
            scheduler: Box::new(ticker),
            ring: Box::new(surface.clone()),
            breathing: Box::new(surface.clone()),
            presenter: Box::new(prompt.clone()),
            haptics: Box::new(prompt.clone()),
        },
    )?;

    let term = Terminal {
        json: args.json,
        interactive: std::io::stdout().is_terminal() && !args.json,
    };
    if !args.json {
        term.line("Serene Timer");
        term.line(&help(&minutes_range));
    }
    info!(minutes = controller.minutes(), "session ready");
    if args.json {
        term.report(&controller.snapshot());
    }

    if args.autostart {
        if let Some(event) = controller.toggle_start_pause() {
            term.report(&event);
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                let Some(event) = controller.on_tick(tick) else { continue };
                let completed = matches!(event, Event::SessionCompleted { .. });
                term.report(&event);
                if completed && args.exit_on_complete {
                    break;
                }
            }
            line = lines.next_line(), if input_open => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        debug!("stdin closed; input disabled");
                        input_open = false;
                        continue;
                    }
                    Err(e) => {
                        warn!("stdin read failed: {e}");
                        input_open = false;
                        continue;
                    }
                };
                let event = match Input::parse(&line, &minutes_range) {
                    Input::Toggle => controller.toggle_start_pause(),
                    Input::Reset => controller.press_reset(),
                    Input::Duration(minutes) => {
                        if controller.controls().duration_adjustable {
                            controller.set_duration(minutes)
                        } else {
                            term.message("duration is locked until reset");
                            None
                        }
                    }
                    Input::Acknowledge => {
                        prompt.acknowledge();
                        None
                    }
                    Input::Help => {
                        term.message(&help(&minutes_range));
                        None
                    }
                    Input::Quit => break,
                    Input::Unknown(text) => {
                        term.message(&format!("unknown input: {text}"));
                        None
                    }
                };
                if let Some(event) = event {
                    term.report(&event);
                }
            }
            _ = frames.tick() => term.draw(&surface, &controller),
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if term.interactive {
        term.line("");
    }
    info!(state = ?controller.run_state(), "leaving session");
    Ok(())
}
