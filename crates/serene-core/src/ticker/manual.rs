use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{Tick, TickHandle, TickId, TickScheduler};

#[derive(Debug)]
struct Producer {
    id: TickId,
    period: Duration,
    fired: u64,
}

#[derive(Debug, Default)]
struct State {
    active: Vec<Producer>,
    armed_total: usize,
}

/// Tick producer that only fires when told to.
///
/// Clones share state, so a driver can keep one clone while the controller
/// owns the other. Useful wherever time should not pass on its own.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    state: Arc<Mutex<State>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Producers armed and not yet cancelled.
    pub fn active_count(&self) -> usize {
        self.lock().active.len()
    }

    /// Producers ever armed.
    pub fn armed_total(&self) -> usize {
        self.lock().armed_total
    }

    /// The most recently armed live producer.
    pub fn current(&self) -> Option<TickId> {
        self.lock().active.last().map(|p| p.id)
    }

    pub fn period(&self) -> Option<Duration> {
        self.lock().active.last().map(|p| p.period)
    }

    /// Fire the most recently armed live producer once.
    pub fn fire(&self) -> Option<Tick> {
        let mut state = self.lock();
        let producer = state.active.last_mut()?;
        producer.fired += 1;
        Some(Tick {
            producer: producer.id,
            sequence: producer.fired,
        })
    }
}

impl TickScheduler for ManualTicker {
    fn arm(&mut self, period: Duration) -> TickHandle {
        let id = TickId::next();
        {
            let mut state = self.lock();
            state.active.push(Producer {
                id,
                period,
                fired: 0,
            });
            state.armed_total += 1;
        }

        let shared = Arc::clone(&self.state);
        TickHandle::new(id, move || {
            shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .active
                .retain(|p| p.id != id);
        })
    }
}
