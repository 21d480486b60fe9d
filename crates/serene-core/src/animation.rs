//! Declarative animation intents handed to the rendering collaborator.
//!
//! The controller, the progress ring and the breathing pacer never talk to a
//! graphics engine. They describe what should move (a [`Layer`] and a
//! [`Property`]), between which values, for how long and how often, and push
//! those descriptions to a [`RenderSurface`]. Whatever draws the screen owns
//! its own presentation clock and interprets the intents.
//!
//! [`AnimationIntent::sample`] evaluates an intent at a point in time so that
//! simple front-ends (the terminal one, tests) can render without an engine.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Visual layers driven by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// The fill arc of the circular progress ring.
    ProgressRing,
    /// The pulsing breathing circle.
    BreathingCore,
    /// The faint guide ring around the breathing circle.
    BreathingHalo,
}

/// Animatable scalar properties of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// Fraction of the ring path that is drawn, 0.0 ..= 1.0.
    StrokeEnd,
    Scale,
    Opacity,
    ShadowRadius,
    ShadowOpacity,
    /// Radians.
    Rotation,
}

impl Property {
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::StrokeEnd => "stroke_end",
            Property::Scale => "scale",
            Property::Opacity => "opacity",
            Property::ShadowRadius => "shadow_radius",
            Property::ShadowOpacity => "shadow_opacity",
            Property::Rotation => "rotation",
        }
    }
}

/// Timing curve of an interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInEaseOut,
}

impl Easing {
    /// Cubic bezier control points `(x1, y1, x2, y2)`.
    fn control_points(self) -> (f64, f64, f64, f64) {
        match self {
            Easing::Linear => (0.0, 0.0, 1.0, 1.0),
            Easing::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Easing::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Easing::EaseInEaseOut => (0.42, 0.0, 0.58, 1.0),
        }
    }

    /// Map linear time `t` in 0.0 ..= 1.0 to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if self == Easing::Linear || t == 0.0 || t == 1.0 {
            return t;
        }
        let (x1, y1, x2, y2) = self.control_points();
        let s = solve_bezier_param(t, x1, x2);
        bezier(s, y1, y2)
    }
}

fn bezier(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x coordinate equals `x`.
fn solve_bezier_param(x: f64, x1: f64, x2: f64) -> f64 {
    const EPSILON: f64 = 1e-7;

    let mut s = x;
    for _ in 0..8 {
        let err = bezier(s, x1, x2) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    // Newton stalled; bisect.
    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    while hi - lo > EPSILON {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

/// How often an intent plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    Once,
    Forever,
}

/// A single property interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationIntent {
    /// Identifies the animation on its layer; a new intent with the same key
    /// replaces the running one.
    pub key: &'static str,
    pub property: Property,
    pub from: f64,
    pub to: f64,
    /// Duration of one pass `from -> to`. An autoreversing intent takes twice
    /// this long per cycle.
    pub duration: Duration,
    pub repeat: Repeat,
    pub autoreverse: bool,
    pub easing: Easing,
}

impl AnimationIntent {
    /// One-shot interpolation.
    pub fn transition(
        key: &'static str,
        property: Property,
        from: f64,
        to: f64,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        Self {
            key,
            property,
            from,
            to,
            duration,
            repeat: Repeat::Once,
            autoreverse: false,
            easing,
        }
    }

    /// Endless back-and-forth between `from` and `to`, `half_period` each way.
    pub fn oscillate(
        key: &'static str,
        property: Property,
        from: f64,
        to: f64,
        half_period: Duration,
        easing: Easing,
    ) -> Self {
        Self {
            key,
            property,
            from,
            to,
            duration: half_period,
            repeat: Repeat::Forever,
            autoreverse: true,
            easing,
        }
    }

    /// Endless `from -> to` restarting at `from` every `period`.
    pub fn cycle(
        key: &'static str,
        property: Property,
        from: f64,
        to: f64,
        period: Duration,
        easing: Easing,
    ) -> Self {
        Self {
            key,
            property,
            from,
            to,
            duration: period,
            repeat: Repeat::Forever,
            autoreverse: false,
            easing,
        }
    }

    /// Length of one full cycle.
    pub fn period(&self) -> Duration {
        if self.autoreverse {
            self.duration.saturating_mul(2)
        } else {
            self.duration
        }
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.repeat == Repeat::Once && elapsed >= self.period()
    }

    /// Value of the animated property `elapsed` after the intent was applied.
    pub fn sample(&self, elapsed: Duration) -> f64 {
        let pass = self.duration.as_secs_f64();
        if pass <= 0.0 {
            return if self.autoreverse { self.from } else { self.to };
        }

        let period = self.period().as_secs_f64();
        let t = elapsed.as_secs_f64();
        let phase = if self.is_finished(elapsed) {
            period
        } else {
            t % period
        };

        let linear = if self.autoreverse && phase >= pass {
            1.0 - (phase - pass) / pass
        } else {
            (phase / pass).min(1.0)
        };

        self.from + (self.to - self.from) * self.easing.apply(linear)
    }
}

/// Implicit animation parameters for a [`Transaction`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub easing: Easing,
}

/// Model value assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub layer: Layer,
    pub property: Property,
    pub value: f64,
}

/// A batch of assignments applied together, optionally smoothed by one
/// shared transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transition: Option<Transition>,
    pub assignments: Vec<Assignment>,
}

impl Transaction {
    /// Assignments that take effect immediately.
    pub fn immediate(assignments: Vec<Assignment>) -> Self {
        Self {
            transition: None,
            assignments,
        }
    }

    pub fn smoothed(transition: Transition, assignments: Vec<Assignment>) -> Self {
        Self {
            transition: Some(transition),
            assignments,
        }
    }
}

/// What the core asks the rendering collaborator to do.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Attach an animation to a layer, replacing one with the same key.
    Animate { layer: Layer, intent: AnimationIntent },
    /// Detach one animation by key.
    RemoveAnimation { layer: Layer, key: &'static str },
    /// Detach every animation on a layer.
    RemoveAllAnimations { layer: Layer },
    /// Update model values.
    Commit(Transaction),
}

/// The rendering collaborator.
pub trait RenderSurface {
    fn submit(&mut self, command: RenderCommand);
}

/// A surface that only remembers what it was asked to do.
///
/// Clones share the same log, so a test can keep one clone and hand the
/// other to the component under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Arc<Mutex<Vec<RenderCommand>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<RenderCommand> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<RenderCommand> {
        std::mem::take(&mut *self.commands.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RenderSurface for RecordingSurface {
    fn submit(&mut self, command: RenderCommand) {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }
}
