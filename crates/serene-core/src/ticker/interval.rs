use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use super::{Tick, TickHandle, TickId, TickScheduler};
use crate::error::Result;

/// Longest period a producer will wait between ticks.
pub const MAX_TICK_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Tick producer backed by a tokio task per armed handle.
///
/// Ticks from every producer flow into the single receiver returned by
/// [`IntervalTicker::new`]; the task owning the controller drains it.
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    runtime: Handle,
    tx: mpsc::UnboundedSender<Tick>,
}

impl IntervalTicker {
    /// Must be called from within a tokio runtime.
    pub fn new() -> Result<(Self, mpsc::UnboundedReceiver<Tick>)> {
        let runtime = Handle::try_current()?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok((Self { runtime, tx }, rx))
    }
}

impl TickScheduler for IntervalTicker {
    fn arm(&mut self, period: Duration) -> TickHandle {
        if period > MAX_TICK_PERIOD {
            warn!(period_ms = period.as_millis() as u64, "tick period capped at one day");
        }
        let period = period.clamp(Duration::from_millis(1), MAX_TICK_PERIOD);
        let producer = TickId::next();
        let tx = self.tx.clone();

        let task = self.runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut sequence = 0;
            loop {
                interval.tick().await;
                sequence += 1;
                trace!(%producer, sequence, "tick");
                if tx.send(Tick { producer, sequence }).is_err() {
                    break;
                }
            }
        });

        debug!(%producer, period_ms = period.as_millis() as u64, "tick producer armed");
        TickHandle::new(producer, move || {
            task.abort();
            debug!(%producer, "tick producer cancelled");
        })
    }
}
