//! Circular progress ring.
//!
//! Maps a fraction in 0.0 ..= 1.0 onto the ring's drawn stroke. Out-of-range
//! input is clamped silently and repeating the current value emits nothing.

use std::time::Duration;

use tracing::trace;

use crate::animation::{
    AnimationIntent, Assignment, Easing, Layer, Property, RenderCommand, RenderSurface,
    Transaction,
};

/// Default length of an animated progress change.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(500);

const PROGRESS_KEY: &str = "progress";
const PULSE_KEY: &str = "pulse";

/// Glow opacity for a given progress.
pub fn glow_opacity(progress: f64) -> f64 {
    0.3 + clamp_unit(progress) * 0.4
}

/// Clamp into 0.0 ..= 1.0, treating NaN as 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub struct ProgressIndicator {
    surface: Box<dyn RenderSurface>,
    value: f64,
    transition: Duration,
    pulsing: bool,
}

impl ProgressIndicator {
    pub fn new(surface: Box<dyn RenderSurface>) -> Self {
        Self::with_transition(surface, DEFAULT_TRANSITION)
    }

    pub fn with_transition(surface: Box<dyn RenderSurface>, transition: Duration) -> Self {
        Self {
            surface,
            value: 0.0,
            transition,
            pulsing: false,
        }
    }

    /// Last value set, after clamping.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulsing
    }

    /// Move the ring to `value`.
    ///
    /// With `animated` the ring eases from the previous value over the
    /// configured transition; otherwise it jumps.
    pub fn set_progress(&mut self, value: f64, animated: bool) {
        let clamped = clamp_unit(value);
        if clamped == self.value {
            return;
        }

        trace!(from = self.value, to = clamped, animated, "progress change");
        if animated {
            self.surface.submit(RenderCommand::Animate {
                layer: Layer::ProgressRing,
                intent: AnimationIntent::transition(
                    PROGRESS_KEY,
                    Property::StrokeEnd,
                    self.value,
                    clamped,
                    self.transition,
                    Easing::EaseInEaseOut,
                ),
            });
        }

        self.surface
            .submit(RenderCommand::Commit(Transaction::immediate(vec![
                Assignment {
                    layer: Layer::ProgressRing,
                    property: Property::StrokeEnd,
                    value: clamped,
                },
                Assignment {
                    layer: Layer::ProgressRing,
                    property: Property::ShadowOpacity,
                    value: glow_opacity(clamped),
                },
            ])));
        self.value = clamped;
    }

    /// Start a gentle repeating swell of the whole ring.
    pub fn pulse(&mut self) {
        if self.pulsing {
            return;
        }
        self.pulsing = true;
        self.surface.submit(RenderCommand::Animate {
            layer: Layer::ProgressRing,
            intent: AnimationIntent::oscillate(
                PULSE_KEY,
                Property::Scale,
                1.0,
                1.05,
                Duration::from_secs(1),
                Easing::EaseInEaseOut,
            ),
        });
    }

    pub fn stop_pulse(&mut self) {
        if !self.pulsing {
            return;
        }
        self.pulsing = false;
        self.surface.submit(RenderCommand::RemoveAnimation {
            layer: Layer::ProgressRing,
            key: PULSE_KEY,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::RecordingSurface;

    fn indicator() -> (ProgressIndicator, RecordingSurface) {
        let surface = RecordingSurface::new();
        (ProgressIndicator::new(Box::new(surface.clone())), surface)
    }

    fn stroke_end(command: &RenderCommand) -> Option<f64> {
        match command {
            RenderCommand::Commit(tx) => tx
                .assignments
                .iter()
                .find(|a| a.property == Property::StrokeEnd)
                .map(|a| a.value),
            _ => None,
        }
    }

    #[test]
    fn clamps_out_of_range_values() {
        let (mut ring, surface) = indicator();
        ring.set_progress(1.7, false);
        assert_eq!(ring.value(), 1.0);
        ring.set_progress(-0.2, false);
        assert_eq!(ring.value(), 0.0);
        ring.set_progress(f64::NAN, false);
        assert_eq!(ring.value(), 0.0);

        let values: Vec<f64> = surface.commands().iter().filter_map(stroke_end).collect();
        assert_eq!(values, vec![1.0, 0.0]);
    }

    #[test]
    fn immediate_update_has_no_interpolation() {
        let (mut ring, surface) = indicator();
        ring.set_progress(0.25, false);
        let commands = surface.commands();
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            RenderCommand::Commit(tx) => {
                assert!(tx.transition.is_none());
                assert_eq!(tx.assignments[1].value, glow_opacity(0.25));
            }
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[test]
    fn animated_update_eases_from_previous_value() {
        let (mut ring, surface) = indicator();
        ring.set_progress(0.6, false);
        surface.take();

        ring.set_progress(0.0, true);
        let commands = surface.commands();
        assert_eq!(commands.len(), 2);
        match &commands[0] {
            RenderCommand::Animate { layer, intent } => {
                assert_eq!(*layer, Layer::ProgressRing);
                assert_eq!(intent.property, Property::StrokeEnd);
                assert_eq!(intent.from, 0.6);
                assert_eq!(intent.to, 0.0);
                assert_eq!(intent.duration, Duration::from_millis(500));
                assert_eq!(intent.easing, Easing::EaseInEaseOut);
                assert!(!intent.autoreverse);
            }
            other => panic!("expected animation, got {other:?}"),
        }
        assert_eq!(stroke_end(&commands[1]), Some(0.0));
    }

    #[test]
    fn repeated_value_is_idempotent() {
        let (mut ring, surface) = indicator();
        ring.set_progress(0.5, true);
        let before = surface.len();
        ring.set_progress(0.5, true);
        ring.set_progress(0.5, false);
        assert_eq!(surface.len(), before);
    }

    #[test]
    fn pulse_toggles_once() {
        let (mut ring, surface) = indicator();
        ring.stop_pulse();
        assert!(surface.is_empty());

        ring.pulse();
        ring.pulse();
        assert!(ring.is_pulsing());
        assert_eq!(surface.len(), 1);

        ring.stop_pulse();
        ring.stop_pulse();
        assert!(!ring.is_pulsing());
        assert_eq!(
            surface.commands().last(),
            Some(&RenderCommand::RemoveAnimation {
                layer: Layer::ProgressRing,
                key: PULSE_KEY,
            })
        );
    }
}
