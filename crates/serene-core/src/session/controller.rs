//! Session controller.
//!
//! Owns the [`Session`], the tick producer handle and both rendering
//! components. All calls happen on one logical thread; ticks arrive as
//! values the caller feeds to [`SessionController::on_tick`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!   ^        |
//!   +--------+  reset / completion
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = SessionController::new(settings, collaborators)?;
//! controller.toggle_start_pause();
//! // For every tick delivered by the scheduler:
//! controller.on_tick(tick); // Returns Some(Event::SessionCompleted) at zero
//! ```

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use super::controls::{format_clock, Controls};
use super::model::{RunState, Session, DEFAULT_MINUTES};
use crate::animation::RenderSurface;
use crate::error::Result;
use crate::events::Event;
use crate::feedback::{CompletionNotice, CompletionPresenter, Feedback, Haptics};
use crate::pacer::{BreathingPacer, DEFAULT_CYCLE};
use crate::progress::{ProgressIndicator, DEFAULT_TRANSITION};
use crate::storage::Config;
use crate::ticker::{Tick, TickHandle, TickId, TickScheduler, DEFAULT_TICK_INTERVAL};

/// Tunables for a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub default_minutes: u32,
    pub tick_interval: Duration,
    pub progress_transition: Duration,
    pub breathing_cycle: Duration,
    pub haptics: bool,
    pub completion_notice: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            default_minutes: DEFAULT_MINUTES,
            tick_interval: DEFAULT_TICK_INTERVAL,
            progress_transition: DEFAULT_TRANSITION,
            breathing_cycle: DEFAULT_CYCLE,
            haptics: true,
            completion_notice: true,
        }
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_minutes: config.session.default_duration_min,
            tick_interval: config.tick_interval(),
            progress_transition: config.progress_transition(),
            breathing_cycle: config.breathing_cycle(),
            haptics: config.feedback.haptics,
            completion_notice: config.feedback.completion_notice,
        }
    }
}

/// External collaborators a controller talks to.
pub struct Collaborators {
    pub scheduler: Box<dyn TickScheduler>,
    /// Surface of the progress ring.
    pub ring: Box<dyn RenderSurface>,
    /// Surface of the breathing pacer.
    pub breathing: Box<dyn RenderSurface>,
    pub presenter: Box<dyn CompletionPresenter>,
    pub haptics: Box<dyn Haptics>,
}

pub struct SessionController {
    session: Session,
    minutes: u32,
    controls: Controls,
    progress: ProgressIndicator,
    pacer: BreathingPacer,
    scheduler: Box<dyn TickScheduler>,
    /// The only armed producer, present exactly while running.
    ticker: Option<TickHandle>,
    presenter: Box<dyn CompletionPresenter>,
    haptics: Box<dyn Haptics>,
    settings: ControllerSettings,
}

impl SessionController {
    /// Create an idle controller with the configured default duration.
    ///
    /// # Errors
    /// Returns a validation error if the default duration is zero minutes.
    pub fn new(settings: ControllerSettings, collaborators: Collaborators) -> Result<Self> {
        let session = Session::from_minutes(settings.default_minutes)?;
        Ok(Self {
            session,
            minutes: settings.default_minutes,
            controls: Controls::idle(),
            progress: ProgressIndicator::with_transition(
                collaborators.ring,
                settings.progress_transition,
            ),
            pacer: BreathingPacer::with_cycle(collaborators.breathing, settings.breathing_cycle),
            scheduler: collaborators.scheduler,
            ticker: None,
            presenter: collaborators.presenter,
            haptics: collaborators.haptics,
            settings,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn run_state(&self) -> RunState {
        self.session.run_state()
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// Value currently shown on the ring.
    pub fn progress(&self) -> f64 {
        self.progress.value()
    }

    pub fn is_breathing(&self) -> bool {
        self.pacer.is_active()
    }

    /// Producer whose ticks are currently honored.
    pub fn armed_producer(&self) -> Option<TickId> {
        self.ticker.as_ref().map(TickHandle::id)
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            run_state: self.session.run_state(),
            total_secs: self.session.total_secs(),
            remaining_secs: self.session.remaining_secs(),
            progress: self.session.progress(),
            clock: format_clock(self.session.remaining_secs()),
            controls: self.controls,
            breathing: self.pacer.is_active(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Select a new session length. Accepted in every state; the countdown
    /// restarts from the new total without changing the run state.
    pub fn set_duration(&mut self, minutes: u32) -> Option<Event> {
        if minutes == 0 {
            debug!("ignoring zero-minute duration");
            return None;
        }
        let total_secs = u64::from(minutes) * 60;
        self.minutes = minutes;
        self.session.rebase(total_secs);
        self.progress.set_progress(0.0, false);
        info!(minutes, state = ?self.session.run_state(), "duration changed");
        Some(Event::DurationChanged {
            minutes,
            total_secs,
            run_state: self.session.run_state(),
            at: Utc::now(),
        })
    }

    /// The start/pause button.
    pub fn toggle_start_pause(&mut self) -> Option<Event> {
        self.feedback(Feedback::ImpactMedium);
        match self.session.run_state() {
            RunState::Idle | RunState::Paused => Some(self.run()),
            RunState::Running => Some(self.pause()),
        }
    }

    /// The reset button.
    pub fn press_reset(&mut self) -> Option<Event> {
        self.feedback(Feedback::ImpactLight);
        self.reset()
    }

    /// Back to idle with the full duration remaining.
    pub fn reset(&mut self) -> Option<Event> {
        self.disarm();
        self.session.rewind();
        self.pacer.stop();
        self.progress.set_progress(0.0, true);
        self.controls = Controls::idle();
        info!(total_secs = self.session.total_secs(), "session reset");
        Some(Event::SessionReset {
            total_secs: self.session.total_secs(),
            at: Utc::now(),
        })
    }

    /// Count one second down. Ticks while not running, or from a producer
    /// other than the armed one, are ignored.
    pub fn on_tick(&mut self, tick: Tick) -> Option<Event> {
        if self.session.run_state() != RunState::Running {
            debug!(producer = %tick.producer, "tick while not running");
            return None;
        }
        if self.armed_producer() != Some(tick.producer) {
            debug!(producer = %tick.producer, "stale tick");
            return None;
        }

        let remaining_secs = self.session.count_down();
        let progress = self.session.progress();
        self.progress.set_progress(progress, false);

        if remaining_secs == 0 {
            return Some(self.complete());
        }
        Some(Event::Ticked {
            remaining_secs,
            progress,
            at: Utc::now(),
        })
    }

    /// Change the breathing rhythm; takes effect on the next start.
    pub fn set_breathing_cycle(&mut self, cycle: Duration) {
        self.pacer.set_cycle(cycle);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn run(&mut self) -> Event {
        let resumed = self.session.run_state() == RunState::Paused;
        self.arm();
        self.session.set_run_state(RunState::Running);
        self.pacer.start();
        self.controls = Controls::running();

        let remaining_secs = self.session.remaining_secs();
        if resumed {
            info!(remaining_secs, "session resumed");
            Event::SessionResumed {
                remaining_secs,
                at: Utc::now(),
            }
        } else {
            info!(total_secs = self.session.total_secs(), "session started");
            Event::SessionStarted {
                total_secs: self.session.total_secs(),
                remaining_secs,
                at: Utc::now(),
            }
        }
    }

    fn pause(&mut self) -> Event {
        self.disarm();
        self.session.set_run_state(RunState::Paused);
        self.pacer.stop();
        self.controls = Controls::paused();

        let remaining_secs = self.session.remaining_secs();
        info!(remaining_secs, "session paused");
        Event::SessionPaused {
            remaining_secs,
            at: Utc::now(),
        }
    }

    fn complete(&mut self) -> Event {
        let total_secs = self.session.total_secs();
        self.reset();

        if self.settings.completion_notice {
            self.presenter
                .present(&CompletionNotice::for_session(total_secs));
        }
        self.feedback(Feedback::Success);
        info!(total_secs, "session complete");
        Event::SessionCompleted {
            total_secs,
            at: Utc::now(),
        }
    }

    fn arm(&mut self) {
        self.disarm();
        self.ticker = Some(self.scheduler.arm(self.settings.tick_interval));
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.cancel();
        }
    }

    fn feedback(&mut self, feedback: Feedback) {
        if self.settings.haptics {
            self.haptics.emit(feedback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::RecordingSurface;
    use crate::feedback::RecordingFeedback;
    use crate::ticker::ManualTicker;

    struct Rig {
        controller: SessionController,
        ticker: ManualTicker,
        feedback: RecordingFeedback,
    }

    fn rig() -> Rig {
        let ticker = ManualTicker::new();
        let feedback = RecordingFeedback::new();
        let controller = SessionController::new(
            ControllerSettings::default(),
            Collaborators {
                scheduler: Box::new(ticker.clone()),
                ring: Box::new(RecordingSurface::new()),
                breathing: Box::new(RecordingSurface::new()),
                presenter: Box::new(feedback.clone()),
                haptics: Box::new(feedback.clone()),
            },
        )
        .unwrap();
        Rig {
            controller,
            ticker,
            feedback,
        }
    }

    #[test]
    fn starts_idle_with_default_duration() {
        let rig = rig();
        assert_eq!(rig.controller.run_state(), RunState::Idle);
        assert_eq!(rig.controller.session().total_secs(), 300);
        assert_eq!(rig.controller.controls(), Controls::idle());
        assert!(rig.controller.armed_producer().is_none());
    }

    #[test]
    fn rejects_zero_default_duration() {
        let result = SessionController::new(
            ControllerSettings {
                default_minutes: 0,
                ..ControllerSettings::default()
            },
            Collaborators {
                scheduler: Box::new(ManualTicker::new()),
                ring: Box::new(RecordingSurface::new()),
                breathing: Box::new(RecordingSurface::new()),
                presenter: Box::new(crate::feedback::Silent),
                haptics: Box::new(crate::feedback::Silent),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn start_pause_resume() {
        let mut rig = rig();
        assert!(matches!(
            rig.controller.toggle_start_pause(),
            Some(Event::SessionStarted { total_secs: 300, .. })
        ));
        assert_eq!(rig.controller.run_state(), RunState::Running);
        assert!(rig.controller.is_breathing());
        assert_eq!(rig.ticker.period(), Some(Duration::from_secs(1)));

        assert!(matches!(
            rig.controller.toggle_start_pause(),
            Some(Event::SessionPaused { .. })
        ));
        assert_eq!(rig.controller.run_state(), RunState::Paused);
        assert!(!rig.controller.is_breathing());
        assert_eq!(rig.ticker.active_count(), 0);
        assert_eq!(rig.controller.controls(), Controls::paused());

        assert!(matches!(
            rig.controller.toggle_start_pause(),
            Some(Event::SessionResumed { .. })
        ));
        assert_eq!(rig.ticker.active_count(), 1);
        assert_eq!(rig.controller.controls(), Controls::running());
        assert_eq!(
            rig.feedback.signals(),
            vec![Feedback::ImpactMedium; 3]
        );
    }

    #[test]
    fn tick_counts_down_and_drives_ring() {
        let mut rig = rig();
        rig.controller.set_duration(1);
        rig.controller.toggle_start_pause();

        let tick = rig.ticker.fire().unwrap();
        match rig.controller.on_tick(tick) {
            Some(Event::Ticked {
                remaining_secs,
                progress,
                ..
            }) => {
                assert_eq!(remaining_secs, 59);
                assert!((progress - 1.0 / 60.0).abs() < 1e-12);
            }
            other => panic!("expected tick event, got {other:?}"),
        }
        assert_eq!(rig.controller.progress(), rig.controller.session().progress());
    }

    #[test]
    fn ticks_outside_running_are_ignored() {
        let mut rig = rig();
        rig.controller.toggle_start_pause();
        let tick = rig.ticker.fire().unwrap();
        rig.controller.toggle_start_pause();

        assert!(rig.controller.on_tick(tick).is_none());
        assert_eq!(rig.controller.session().remaining_secs(), 300);
    }

    #[test]
    fn stale_tick_from_cancelled_producer_is_ignored() {
        let mut rig = rig();
        rig.controller.toggle_start_pause();
        let stale = rig.ticker.fire().unwrap();
        rig.controller.toggle_start_pause();
        rig.controller.toggle_start_pause();

        assert!(rig.controller.on_tick(stale).is_none());
        let live = rig.ticker.fire().unwrap();
        assert!(rig.controller.on_tick(live).is_some());
        assert_eq!(rig.controller.session().remaining_secs(), 299);
    }

    #[test]
    fn set_duration_while_running_keeps_running() {
        let mut rig = rig();
        rig.controller.toggle_start_pause();
        let tick = rig.ticker.fire().unwrap();
        rig.controller.on_tick(tick);

        let event = rig.controller.set_duration(10);
        assert!(matches!(
            event,
            Some(Event::DurationChanged {
                minutes: 10,
                total_secs: 600,
                run_state: RunState::Running,
                ..
            })
        ));
        assert_eq!(rig.controller.session().remaining_secs(), 600);
        assert_eq!(rig.controller.progress(), 0.0);
        assert_eq!(rig.ticker.active_count(), 1);
        assert_eq!(rig.ticker.armed_total(), 1);
    }

    #[test]
    fn zero_minutes_is_ignored() {
        let mut rig = rig();
        assert!(rig.controller.set_duration(0).is_none());
        assert_eq!(rig.controller.session().total_secs(), 300);
    }

    #[test]
    fn press_reset_signals_light_impact() {
        let mut rig = rig();
        rig.controller.press_reset();
        assert_eq!(rig.feedback.signals(), vec![Feedback::ImpactLight]);
        assert_eq!(rig.controller.run_state(), RunState::Idle);
    }

    #[test]
    fn haptics_can_be_disabled() {
        let ticker = ManualTicker::new();
        let feedback = RecordingFeedback::new();
        let mut controller = SessionController::new(
            ControllerSettings {
                haptics: false,
                completion_notice: false,
                default_minutes: 1,
                ..ControllerSettings::default()
            },
            Collaborators {
                scheduler: Box::new(ticker.clone()),
                ring: Box::new(RecordingSurface::new()),
                breathing: Box::new(RecordingSurface::new()),
                presenter: Box::new(feedback.clone()),
                haptics: Box::new(feedback.clone()),
            },
        )
        .unwrap();

        controller.toggle_start_pause();
        for _ in 0..60 {
            let tick = ticker.fire().unwrap();
            controller.on_tick(tick);
        }
        assert_eq!(controller.run_state(), RunState::Idle);
        assert!(feedback.signals().is_empty());
        assert!(feedback.notices().is_empty());
    }

    #[test]
    fn dropping_controller_cancels_producer() {
        let rig = rig();
        let Rig {
            mut controller,
            ticker,
            ..
        } = rig;
        controller.toggle_start_pause();
        assert_eq!(ticker.active_count(), 1);
        drop(controller);
        assert_eq!(ticker.active_count(), 0);
    }
}
