//! Breathing pacer.
//!
//! An on/off visual guide: while active the core circle swells for half a
//! cycle (breathe in) and shrinks for the other half (breathe out), the halo
//! follows faintly and slowly turns. It knows nothing about the countdown.

use std::f64::consts::TAU;
use std::time::Duration;

use tracing::debug;

use crate::animation::{
    AnimationIntent, Assignment, Easing, Layer, Property, RenderCommand, RenderSurface,
    Transaction, Transition,
};

/// Four seconds in, four seconds out.
pub const DEFAULT_CYCLE: Duration = Duration::from_secs(8);

/// One halo turn takes this many breathing cycles.
const ROTATION_CYCLES: u32 = 4;

const SETTLE: Transition = Transition {
    duration: Duration::from_secs(1),
    easing: Easing::EaseOut,
};

/// Appearance of the pacer when idle.
pub fn rest_appearance() -> Vec<Assignment> {
    vec![
        Assignment {
            layer: Layer::BreathingCore,
            property: Property::Scale,
            value: 1.0,
        },
        Assignment {
            layer: Layer::BreathingCore,
            property: Property::Opacity,
            value: 0.6,
        },
        Assignment {
            layer: Layer::BreathingCore,
            property: Property::ShadowRadius,
            value: 8.0,
        },
        Assignment {
            layer: Layer::BreathingHalo,
            property: Property::Scale,
            value: 1.0,
        },
        Assignment {
            layer: Layer::BreathingHalo,
            property: Property::Opacity,
            value: 0.2,
        },
        Assignment {
            layer: Layer::BreathingHalo,
            property: Property::Rotation,
            value: 0.0,
        },
    ]
}

pub struct BreathingPacer {
    surface: Box<dyn RenderSurface>,
    cycle: Duration,
    active: bool,
}

impl BreathingPacer {
    pub fn new(surface: Box<dyn RenderSurface>) -> Self {
        Self::with_cycle(surface, DEFAULT_CYCLE)
    }

    pub fn with_cycle(surface: Box<dyn RenderSurface>, cycle: Duration) -> Self {
        Self {
            surface,
            cycle,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cycle(&self) -> Duration {
        self.cycle
    }

    /// Change the breathing rhythm. Applies from the next [`start`](Self::start).
    pub fn set_cycle(&mut self, cycle: Duration) {
        self.cycle = cycle;
    }

    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        debug!(cycle_secs = self.cycle.as_secs_f64(), "breathing pacer started");

        let half = self.cycle / 2;
        let breath = |key, property, from, to| {
            AnimationIntent::oscillate(key, property, from, to, half, Easing::EaseInEaseOut)
        };

        let intents = [
            (Layer::BreathingCore, breath("breathing_scale", Property::Scale, 0.8, 1.4)),
            (Layer::BreathingCore, breath("breathing_opacity", Property::Opacity, 0.6, 1.0)),
            (Layer::BreathingCore, breath("breathing_shadow", Property::ShadowRadius, 4.0, 12.0)),
            (Layer::BreathingHalo, breath("halo_scale", Property::Scale, 1.0, 1.1)),
            (Layer::BreathingHalo, breath("halo_opacity", Property::Opacity, 0.1, 0.3)),
            (
                Layer::BreathingHalo,
                AnimationIntent::cycle(
                    "halo_rotation",
                    Property::Rotation,
                    0.0,
                    TAU,
                    self.cycle.saturating_mul(ROTATION_CYCLES),
                    Easing::Linear,
                ),
            ),
        ];
        for (layer, intent) in intents {
            self.surface.submit(RenderCommand::Animate { layer, intent });
        }
    }

    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        debug!("breathing pacer stopped");

        self.surface.submit(RenderCommand::RemoveAllAnimations {
            layer: Layer::BreathingCore,
        });
        self.surface.submit(RenderCommand::RemoveAllAnimations {
            layer: Layer::BreathingHalo,
        });
        self.surface.submit(RenderCommand::Commit(Transaction::smoothed(
            SETTLE,
            rest_appearance(),
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{RecordingSurface, Repeat};

    fn pacer() -> (BreathingPacer, RecordingSurface) {
        let surface = RecordingSurface::new();
        (BreathingPacer::new(Box::new(surface.clone())), surface)
    }

    fn intents(commands: &[RenderCommand]) -> Vec<(Layer, AnimationIntent)> {
        commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Animate { layer, intent } => Some((*layer, intent.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_layers_breathing_and_rotation() {
        let (mut pacer, surface) = pacer();
        pacer.start();
        let started = intents(&surface.commands());
        assert_eq!(started.len(), 6);

        for (_, intent) in started.iter().filter(|(_, i)| i.property != Property::Rotation) {
            assert_eq!(intent.duration, Duration::from_secs(4));
            assert_eq!(intent.period(), Duration::from_secs(8));
            assert!(intent.autoreverse);
            assert_eq!(intent.repeat, Repeat::Forever);
            assert_eq!(intent.easing, Easing::EaseInEaseOut);
        }

        let (layer, rotation) = started
            .iter()
            .find(|(_, i)| i.property == Property::Rotation)
            .expect("rotation intent");
        assert_eq!(*layer, Layer::BreathingHalo);
        assert_eq!(rotation.duration, Duration::from_secs(32));
        assert!(!rotation.autoreverse);
        assert_eq!(rotation.easing, Easing::Linear);
        assert_eq!(rotation.to, TAU);
    }

    #[test]
    fn start_is_idempotent() {
        let (mut pacer, surface) = pacer();
        pacer.start();
        let once = surface.len();
        pacer.start();
        assert_eq!(surface.len(), once);
        assert!(pacer.is_active());
    }

    #[test]
    fn stop_when_inactive_leaves_rest_state_alone() {
        let (mut pacer, surface) = pacer();
        pacer.stop();
        assert!(surface.is_empty());
    }

    #[test]
    fn stop_settles_in_one_transaction() {
        let (mut pacer, surface) = pacer();
        pacer.start();
        surface.take();

        pacer.stop();
        pacer.stop();
        let commands = surface.commands();
        assert_eq!(commands.len(), 3);
        let commits: Vec<&Transaction> = commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Commit(tx) => Some(tx),
                _ => None,
            })
            .collect();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].transition, Some(SETTLE));
        assert_eq!(commits[0].assignments, rest_appearance());
    }

    #[test]
    fn cycle_change_applies_on_next_start() {
        let (mut pacer, surface) = pacer();
        pacer.set_cycle(Duration::from_secs(6));
        pacer.start();
        let started = intents(&surface.commands());
        assert!(started
            .iter()
            .filter(|(_, i)| i.autoreverse)
            .all(|(_, i)| i.duration == Duration::from_secs(3)));
        assert!(started
            .iter()
            .any(|(_, i)| i.duration == Duration::from_secs(24)));
    }

    #[test]
    fn oversized_cycle_saturates_rotation() {
        let surface = RecordingSurface::new();
        let mut pacer = BreathingPacer::with_cycle(Box::new(surface.clone()), Duration::MAX);
        pacer.start();
        let started = intents(&surface.commands());
        assert_eq!(started.len(), 6);
        let (_, rotation) = started
            .iter()
            .find(|(_, i)| i.property == Property::Rotation)
            .expect("rotation intent");
        assert_eq!(rotation.duration, Duration::MAX);
        assert!(rotation.sample(Duration::from_secs(1)) < 1e-9);
    }
}
