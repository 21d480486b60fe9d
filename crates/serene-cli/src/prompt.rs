//! Completion notice and haptics for a terminal.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use serene_core::feedback::{CompletionNotice, CompletionPresenter, Feedback, Haptics};
use tracing::trace;

/// Prints the completion notice and keeps it pending until acknowledged.
/// Success feedback rings the terminal bell.
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompt {
    json: bool,
    pending: Arc<Mutex<Option<CompletionNotice>>>,
}

impl TerminalPrompt {
    /// In `json` mode the notice is printed as one JSON line.
    pub fn new(json: bool) -> Self {
        Self {
            json,
            ..Self::default()
        }
    }

    /// Dismiss the pending notice. Returns whether there was one.
    pub fn acknowledge(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    fn render(&self, notice: &CompletionNotice) -> String {
        if self.json {
            serde_json::json!({ "type": "completion_notice", "notice": notice }).to_string()
        } else {
            format!(
                "\n\n  {}\n  {}\n  [Enter] {}",
                notice.title, notice.message, notice.acknowledge
            )
        }
    }
}

impl CompletionPresenter for TerminalPrompt {
    fn present(&mut self, notice: &CompletionNotice) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", self.render(notice));
        let _ = out.flush();
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(notice.clone());
    }
}

impl Haptics for TerminalPrompt {
    fn emit(&mut self, feedback: Feedback) {
        trace!(?feedback, "haptic");
        if feedback == Feedback::Success {
            let mut err = std::io::stderr().lock();
            let _ = write!(err, "\x07");
            let _ = err.flush();
        }
    }
}
