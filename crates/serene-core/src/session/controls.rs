//! What the input surface shows, and how its raw values map to minutes.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Shortest selectable session.
pub const MIN_MINUTES: u32 = 1;
/// Longest selectable session.
pub const MAX_MINUTES: u32 = 60;

/// Whole minutes selected by a continuous slider value.
///
/// Truncates, then clamps to `MIN_MINUTES ..= MAX_MINUTES`.
pub fn slider_minutes(value: f64) -> u32 {
    slider_minutes_in(value, &(MIN_MINUTES..=MAX_MINUTES))
}

/// [`slider_minutes`] for a slider spanning `range`. An inverted range
/// collapses to its start.
pub fn slider_minutes_in(value: f64, range: &RangeInclusive<u32>) -> u32 {
    let min = *range.start();
    let max = (*range.end()).max(min);
    if value.is_nan() {
        return min;
    }
    value.trunc().clamp(f64::from(min), f64::from(max)) as u32
}

/// `m:ss`
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn format_duration_label(minutes: u32) -> String {
    format!("Duration: {minutes}:00")
}

/// What pressing the primary button would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryAction {
    Start,
    Pause,
    Resume,
}

impl PrimaryAction {
    pub fn label(&self) -> &'static str {
        match self {
            PrimaryAction::Start => "Start",
            PrimaryAction::Pause => "Pause",
            PrimaryAction::Resume => "Resume",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Calm,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub primary: PrimaryAction,
    pub accent: Accent,
    /// Whether the duration slider accepts input.
    pub duration_adjustable: bool,
}

impl Controls {
    pub fn idle() -> Self {
        Self {
            primary: PrimaryAction::Start,
            accent: Accent::Calm,
            duration_adjustable: true,
        }
    }

    pub fn running() -> Self {
        Self {
            primary: PrimaryAction::Pause,
            accent: Accent::Active,
            duration_adjustable: false,
        }
    }

    /// The slider stays locked until a reset.
    pub fn paused() -> Self {
        Self {
            primary: PrimaryAction::Resume,
            accent: Accent::Calm,
            duration_adjustable: false,
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::idle()
    }
}
