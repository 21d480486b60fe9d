//! The session value object.

use serde::{Deserialize, Serialize};

use super::controls::format_clock;
use crate::error::ValidationError;
use crate::progress::clamp_unit;

/// Duration a fresh controller starts with.
pub const DEFAULT_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
}

/// Fraction of `total_secs` already elapsed, in 0.0 ..= 1.0.
pub fn progress_of(total_secs: u64, remaining_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    let elapsed = total_secs.saturating_sub(remaining_secs);
    clamp_unit(elapsed as f64 / total_secs as f64)
}

/// Countdown state of one meditation session.
///
/// `remaining_secs <= total_secs` and `total_secs > 0` hold for every value
/// of this type. Only the controller moves the run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Session {
    total_secs: u64,
    remaining_secs: u64,
    run_state: RunState,
}

impl Session {
    /// A fresh, idle session with the full duration remaining.
    pub fn new(total_secs: u64) -> Result<Self, ValidationError> {
        Self::restore(total_secs, total_secs)
    }

    pub fn from_minutes(minutes: u32) -> Result<Self, ValidationError> {
        Self::new(u64::from(minutes) * 60)
    }

    /// An idle session part way through.
    pub fn restore(total_secs: u64, remaining_secs: u64) -> Result<Self, ValidationError> {
        if total_secs == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        if remaining_secs > total_secs {
            return Err(ValidationError::RemainingExceedsTotal {
                remaining_secs,
                total_secs,
            });
        }
        Ok(Self {
            total_secs,
            remaining_secs,
            run_state: RunState::Idle,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs - self.remaining_secs
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn progress(&self) -> f64 {
        progress_of(self.total_secs, self.remaining_secs)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Remaining time as `m:ss`.
    pub fn clock(&self) -> String {
        format_clock(self.remaining_secs)
    }

    // ── Mutation (controller only) ───────────────────────────────────

    /// New total with the full duration remaining. Run state is kept.
    pub(crate) fn rebase(&mut self, total_secs: u64) {
        debug_assert!(total_secs > 0);
        self.total_secs = total_secs;
        self.remaining_secs = total_secs;
    }

    /// Back to the full duration, idle.
    pub(crate) fn rewind(&mut self) {
        self.remaining_secs = self.total_secs;
        self.run_state = RunState::Idle;
    }

    /// Take one second off. Returns what is left.
    pub(crate) fn count_down(&mut self) -> u64 {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.remaining_secs
    }

    pub(crate) fn set_run_state(&mut self, run_state: RunState) {
        self.run_state = run_state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle_and_full() {
        let session = Session::from_minutes(5).unwrap();
        assert_eq!(session.total_secs(), 300);
        assert_eq!(session.remaining_secs(), 300);
        assert_eq!(session.run_state(), RunState::Idle);
        assert_eq!(session.progress(), 0.0);
        assert_eq!(session.clock(), "5:00");
    }

    #[test]
    fn rejects_empty_and_overfull_sessions() {
        assert_eq!(Session::new(0), Err(ValidationError::ZeroDuration));
        assert_eq!(
            Session::restore(60, 61),
            Err(ValidationError::RemainingExceedsTotal {
                remaining_secs: 61,
                total_secs: 60
            })
        );
    }

    #[test]
    fn progress_reaches_one_at_zero_remaining() {
        let session = Session::restore(60, 0).unwrap();
        assert_eq!(session.progress(), 1.0);
        assert!(session.is_finished());
        assert_eq!(progress_of(60, 45), 0.25);
        assert_eq!(progress_of(0, 0), 0.0);
    }

    #[test]
    fn count_down_stops_at_zero() {
        let mut session = Session::new(2).unwrap();
        assert_eq!(session.count_down(), 1);
        assert_eq!(session.count_down(), 0);
        assert_eq!(session.count_down(), 0);
        assert_eq!(session.elapsed_secs(), 2);
    }

    #[test]
    fn rebase_keeps_run_state() {
        let mut session = Session::new(300).unwrap();
        session.set_run_state(RunState::Paused);
        session.count_down();
        session.rebase(600);
        assert_eq!(session.remaining_secs(), 600);
        assert_eq!(session.run_state(), RunState::Paused);
    }
}
