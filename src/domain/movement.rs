//! Up/down/flat movement classification.
//!
//! Chart panes colour candles and volume bars by the bar's own movement
//! (close vs open) and colour the live price line by the session's movement
//! against the previous close. Both reduce to the same strict comparison.

use crate::domain::price::PriceBar;
use crate::domain::session::SessionWindow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Up,
    Down,
    Flat,
}

impl Movement {
    /// Strict comparison of a value against a benchmark. Equal values are
    /// `Flat`; no tolerance is applied.
    pub fn classify(value: f64, benchmark: f64) -> Self {
        if value > benchmark {
            Movement::Up
        } else if value < benchmark {
            Movement::Down
        } else {
            Movement::Flat
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Movement::Up => write!(f, "up"),
            Movement::Down => write!(f, "down"),
            Movement::Flat => write!(f, "flat"),
        }
    }
}

/// Close vs open for a single bar.
pub fn bar_movement(bar: &PriceBar) -> Movement {
    Movement::classify(bar.close, bar.open)
}

/// Last close of the current session vs the previous session's close.
/// `None` when either side of the window is empty.
pub fn session_movement(window: &SessionWindow) -> Option<Movement> {
    let last = window.current.last_close()?;
    let benchmark = window.previous.last_close()?;
    Some(Movement::classify(last, benchmark))
}
