//! # Serene Core Library
//!
//! This library provides the decision logic of the Serene meditation timer:
//! a countdown session, the circular progress ring that mirrors it, and a
//! breathing pacer that runs while the session does. Drawing, input and
//! timing are collaborators behind traits, so any front-end (the bundled
//! terminal one, a GUI) can drive the same core.
//!
//! ## Architecture
//!
//! - **Session Controller**: The Idle/Running/Paused state machine. The
//!   caller feeds it ticks from a [`TickScheduler`]
//! - **Progress Ring / Breathing Pacer**: Translate state into declarative
//!   [`AnimationIntent`]s for a [`RenderSurface`]
//! - **Tick Producers**: A tokio interval producer and a manual one
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionController`]: Core session state machine
//! - [`Session`]: Countdown value object
//! - [`ProgressIndicator`], [`BreathingPacer`]: Rendering components
//! - [`Config`]: Application configuration management

pub mod animation;
pub mod error;
pub mod events;
pub mod feedback;
pub mod pacer;
pub mod progress;
pub mod session;
pub mod storage;
pub mod ticker;

pub use animation::{
    AnimationIntent, Assignment, Easing, Layer, Property, RecordingSurface, RenderCommand,
    RenderSurface, Repeat, Transaction, Transition,
};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use feedback::{
    CompletionNotice, CompletionPresenter, Feedback, Haptics, RecordingFeedback, Silent,
};
pub use pacer::BreathingPacer;
pub use progress::ProgressIndicator;
pub use session::{
    Collaborators, ControllerSettings, Controls, PrimaryAction, RunState, Session,
    SessionController,
};
pub use storage::Config;
pub use ticker::{IntervalTicker, ManualTicker, Tick, TickHandle, TickId, TickScheduler};
