use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{Controls, RunState};

/// Every state change of a session produces an Event.
/// Front-ends log or display them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        total_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionReset {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    DurationChanged {
        minutes: u32,
        total_secs: u64,
        run_state: RunState,
        at: DateTime<Utc>,
    },
    Ticked {
        remaining_secs: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        run_state: RunState,
        total_secs: u64,
        remaining_secs: u64,
        progress: f64,
        clock: String,
        controls: Controls,
        breathing: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "session_started",
            Event::SessionPaused { .. } => "session_paused",
            Event::SessionResumed { .. } => "session_resumed",
            Event::SessionReset { .. } => "session_reset",
            Event::DurationChanged { .. } => "duration_changed",
            Event::Ticked { .. } => "ticked",
            Event::SessionCompleted { .. } => "session_completed",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
