//! Tick producers.
//!
//! A running session is driven by a repeating tick. The producer is an
//! external collaborator behind [`TickScheduler`]; arming one returns a
//! [`TickHandle`] that owns the producer's lifetime. Cancelling or dropping
//! the handle stops the producer.
//!
//! Every armed producer gets a fresh [`TickId`] and stamps its ticks with it,
//! so a consumer can tell a live tick from one that was already queued when
//! its producer was cancelled.

mod interval;
mod manual;

pub use interval::{IntervalTicker, MAX_TICK_PERIOD};
pub use manual::ManualTicker;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default tick cadence.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Identity of one armed producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickId(u64);

impl TickId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick-{}", self.0)
    }
}

/// One firing of a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub producer: TickId,
    /// 1-based count of ticks from this producer.
    pub sequence: u64,
}

/// Starts repeating tick producers.
pub trait TickScheduler {
    /// Arm a producer firing every `period`. The first tick arrives one
    /// period after arming.
    fn arm(&mut self, period: Duration) -> TickHandle;
}

/// Exclusive ownership of an armed producer.
pub struct TickHandle {
    id: TickId,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TickHandle {
    pub fn new(id: TickId, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> TickId {
        self.id
    }

    /// Stop the producer. Ticks it already delivered are not recalled.
    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickHandle")
            .field("id", &self.id)
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}
