//! Terminal rendering of the progress ring and breathing pacer.
//!
//! [`TerminalSurface`] keeps a tiny layer model: committed property values
//! plus the animations attached to each layer. Frames sample that model at
//! the current instant, so the ring eases and the pacer breathes in text.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use serene_core::animation::{
    AnimationIntent, Layer, Property, RenderCommand, RenderSurface, Transition,
};
use serene_core::pacer::rest_appearance;
use serene_core::session::format_duration_label;
use serene_core::SessionController;

const RING_WIDTH: usize = 30;
const BREATH_WIDTH: usize = 9;

#[derive(Debug, Clone)]
struct Running {
    intent: AnimationIntent,
    since: Instant,
}

#[derive(Debug, Default)]
struct LayerState {
    values: HashMap<Property, f64>,
    animations: Vec<Running>,
}

#[derive(Debug, Default)]
struct Scene {
    layers: HashMap<Layer, LayerState>,
}

impl Scene {
    fn with_rest_appearance() -> Self {
        let mut scene = Self::default();
        for a in rest_appearance() {
            scene
                .layers
                .entry(a.layer)
                .or_default()
                .values
                .insert(a.property, a.value);
        }
        scene
    }

    fn value(&self, layer: Layer, property: Property, now: Instant) -> f64 {
        let Some(state) = self.layers.get(&layer) else {
            return default_value(property);
        };
        let animated = state
            .animations
            .iter()
            .rev()
            .find(|r| {
                r.intent.property == property
                    && !r.intent.is_finished(now.saturating_duration_since(r.since))
            })
            .map(|r| r.intent.sample(now.saturating_duration_since(r.since)));
        animated
            .or_else(|| state.values.get(&property).copied())
            .unwrap_or_else(|| default_value(property))
    }

    fn apply(&mut self, command: RenderCommand, now: Instant) {
        match command {
            RenderCommand::Animate { layer, intent } => {
                let state = self.layers.entry(layer).or_default();
                state.animations.retain(|r| r.intent.key != intent.key);
                state.animations.push(Running { intent, since: now });
            }
            RenderCommand::RemoveAnimation { layer, key } => {
                if let Some(state) = self.layers.get_mut(&layer) {
                    state.animations.retain(|r| r.intent.key != key);
                }
            }
            RenderCommand::RemoveAllAnimations { layer } => {
                if let Some(state) = self.layers.get_mut(&layer) {
                    state.animations.clear();
                }
            }
            RenderCommand::Commit(tx) => {
                for assignment in tx.assignments {
                    let from = self.value(assignment.layer, assignment.property, now);
                    let state = self.layers.entry(assignment.layer).or_default();
                    if let Some(Transition { duration, easing }) = tx.transition {
                        state.animations.push(Running {
                            intent: AnimationIntent::transition(
                                "implicit",
                                assignment.property,
                                from,
                                assignment.value,
                                duration,
                                easing,
                            ),
                            since: now,
                        });
                    }
                    state.values.insert(assignment.property, assignment.value);
                }
            }
        }
    }

    fn prune(&mut self, now: Instant) {
        for state in self.layers.values_mut() {
            state
                .animations
                .retain(|r| !r.intent.is_finished(now.saturating_duration_since(r.since)));
        }
    }
}

fn default_value(property: Property) -> f64 {
    match property {
        Property::Scale | Property::Opacity => 1.0,
        _ => 0.0,
    }
}

/// Shared handle to the terminal scene. Clones draw the same picture.
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    scene: Arc<Mutex<Scene>>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            scene: Arc::new(Mutex::new(Scene::with_rest_appearance())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Scene> {
        self.scene.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fill of the ring as drawn at `now`.
    pub fn ring_fill(&self, now: Instant) -> f64 {
        self.lock()
            .value(Layer::ProgressRing, Property::StrokeEnd, now)
            .clamp(0.0, 1.0)
    }

    /// Breathing circle scale as drawn at `now`.
    pub fn breath_scale(&self, now: Instant) -> f64 {
        self.lock()
            .value(Layer::BreathingCore, Property::Scale, now)
    }

    /// One status line.
    pub fn frame(&self, controller: &SessionController, now: Instant) -> String {
        self.lock().prune(now);
        let fill = self.ring_fill(now);
        let filled = (fill * RING_WIDTH as f64).round() as usize;
        let ring = format!(
            "{}{}",
            "#".repeat(filled),
            ".".repeat(RING_WIDTH.saturating_sub(filled))
        );

        // Rest scale 1.0 draws the middle width; 0.8 ..= 1.4 spans the range.
        let scale = self.breath_scale(now);
        let dots = (((scale - 0.8) / 0.6) * (BREATH_WIDTH - 1) as f64).round() as usize + 1;
        let dots = dots.clamp(1, BREATH_WIDTH);
        let breath = format!("{:^width$}", "o".repeat(dots), width = BREATH_WIDTH);

        format!(
            "[{ring}] {:>3.0}%  {:>5}  ({breath})  {}  [{}]",
            fill * 100.0,
            controller.session().clock(),
            format_duration_label(controller.minutes()),
            controller.controls().primary.label(),
        )
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for TerminalSurface {
    fn submit(&mut self, command: RenderCommand) {
        self.lock().apply(command, Instant::now());
    }
}
