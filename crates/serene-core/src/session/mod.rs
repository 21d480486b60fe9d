mod controller;
mod controls;
mod model;

pub use controller::{Collaborators, ControllerSettings, SessionController};
pub use controls::{
    format_clock, format_duration_label, slider_minutes, slider_minutes_in, Accent, Controls,
    PrimaryAction, MAX_MINUTES, MIN_MINUTES,
};
pub use model::{progress_of, RunState, Session, DEFAULT_MINUTES};
