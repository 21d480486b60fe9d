//! Completion notice and haptic feedback collaborators.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Tactile signal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    /// Start/pause button press.
    ImpactMedium,
    /// Reset button press.
    ImpactLight,
    /// A session ran to completion.
    Success,
}

/// The acknowledgment shown once a session finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionNotice {
    pub title: String,
    pub message: String,
    /// Label of the single dismiss action.
    pub acknowledge: String,
    /// Length of the session that just finished.
    pub duration_secs: u64,
}

impl CompletionNotice {
    pub fn for_session(duration_secs: u64) -> Self {
        Self {
            title: "Session Complete".into(),
            message: "Your meditation session is finished. Take a moment to notice how you feel."
                .into(),
            acknowledge: "Thank you".into(),
            duration_secs,
        }
    }
}

/// Shows the completion notice until the user dismisses it.
pub trait CompletionPresenter {
    fn present(&mut self, notice: &CompletionNotice);
}

/// Fire-and-forget haptic signal.
pub trait Haptics {
    fn emit(&mut self, feedback: Feedback);
}

/// Presenter and haptics that drop everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl CompletionPresenter for Silent {
    fn present(&mut self, _notice: &CompletionNotice) {}
}

impl Haptics for Silent {
    fn emit(&mut self, _feedback: Feedback) {}
}

/// Remembers every notice and signal. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    notices: Arc<Mutex<Vec<CompletionNotice>>>,
    signals: Arc<Mutex<Vec<Feedback>>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<CompletionNotice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn signals(&self) -> Vec<Feedback> {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CompletionPresenter for RecordingFeedback {
    fn present(&mut self, notice: &CompletionNotice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}

impl Haptics for RecordingFeedback {
    fn emit(&mut self, feedback: Feedback) {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(feedback);
    }
}
