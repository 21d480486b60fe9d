//! Line-based input surface.

use std::ops::RangeInclusive;

use serene_core::session::slider_minutes_in;

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// `p`, `s` or a single space: the start/pause button.
    Toggle,
    /// `r`: the reset button.
    Reset,
    /// `d <minutes>`: move the duration slider.
    Duration(u32),
    /// An empty line: dismiss the completion notice.
    Acknowledge,
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    /// `minutes` is the span of the duration slider.
    pub fn parse(line: &str, minutes: &RangeInclusive<u32>) -> Self {
        if line == " " {
            return Input::Toggle;
        }
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Input::Acknowledge;
        };
        match (command.to_ascii_lowercase().as_str(), words.next()) {
            ("p" | "s" | "pause" | "start", None) => Input::Toggle,
            ("r" | "reset", None) => Input::Reset,
            ("q" | "quit" | "exit", None) => Input::Quit,
            ("h" | "?" | "help", None) => Input::Help,
            ("d" | "duration", Some(value)) if words.next().is_none() => {
                match value.parse::<f64>() {
                    Ok(v) if v.is_finite() => Input::Duration(slider_minutes_in(v, minutes)),
                    _ => Input::Unknown(line.trim().to_string()),
                }
            }
            _ => Input::Unknown(line.trim().to_string()),
        }
    }
}

pub fn help(minutes: &RangeInclusive<u32>) -> String {
    format!(
        "keys: [p] start/pause  [r] reset  [d N] duration in minutes ({}-{})  \
         [Enter] dismiss  [q] quit",
        minutes.start(),
        minutes.end()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: RangeInclusive<u32> = 1..=60;

    fn parse(line: &str) -> Input {
        Input::parse(line, &FULL)
    }

    #[test]
    fn parses_buttons() {
        assert_eq!(parse("p"), Input::Toggle);
        assert_eq!(parse(" "), Input::Toggle);
        assert_eq!(parse("Start"), Input::Toggle);
        assert_eq!(parse("r"), Input::Reset);
        assert_eq!(parse("q"), Input::Quit);
        assert_eq!(parse(""), Input::Acknowledge);
        assert_eq!(parse("?"), Input::Help);
    }

    #[test]
    fn duration_uses_slider_semantics() {
        assert_eq!(parse("d 12"), Input::Duration(12));
        assert_eq!(parse("d 12.9"), Input::Duration(12));
        assert_eq!(parse("duration 90"), Input::Duration(60));
        assert_eq!(parse("d 0"), Input::Duration(1));
    }

    #[test]
    fn duration_respects_configured_bounds() {
        let narrow = 5..=30;
        assert_eq!(Input::parse("d 2", &narrow), Input::Duration(5));
        assert_eq!(Input::parse("d 45", &narrow), Input::Duration(30));
        assert!(help(&narrow).contains("(5-30)"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse("d"), Input::Unknown(_)));
        assert!(matches!(parse("d five"), Input::Unknown(_)));
        assert!(matches!(parse("d 5 6"), Input::Unknown(_)));
        assert!(matches!(parse("d nan"), Input::Unknown(_)));
        assert!(matches!(parse("jump"), Input::Unknown(_)));
    }
}
