//! Trading-session resolution.
//!
//! Finds the most recent day with trading activity and the session before
//! it by stepping backward one calendar day at a time, skipping weekends
//! and holidays. Each side gets the initial probe plus [`MAX_BACKSTEPS`]
//! retries; running out on the current side means the instrument has no
//! data at all (not merely a long weekend), so the previous side is not
//! probed either.

use crate::domain::price::PriceSeries;
use crate::ports::price_port::PricePort;
use chrono::{Duration, NaiveDate};

/// Backward steps allowed after the initial probe, per side. Six
/// consecutive empty days terminate the search: long weekends and
/// single-day outages fit inside the budget, an unknown symbol does not.
pub const MAX_BACKSTEPS: usize = 5;

/// The latest resolved trading session and its immediate predecessor.
/// Either side may be empty; when `current` is non-empty every timestamp
/// in `previous` precedes every timestamp in `current`.
#[derive(Debug, Clone)]
pub struct SessionWindow {
    pub current: PriceSeries,
    pub previous: PriceSeries,
}

impl SessionWindow {
    /// False when the current-side search ran out of retries, i.e. the
    /// instrument produced no data within the probe window.
    pub fn is_resolved(&self) -> bool {
        !self.current.is_empty()
    }
}

/// Resolve the session window for `code` as seen from `today`.
///
/// Fetch errors count as empty days; this function itself never fails.
pub fn resolve_session_window(
    port: &dyn PricePort,
    code: &str,
    today: NaiveDate,
) -> SessionWindow {
    let Some((current, found_on)) = probe_backward(port, code, today) else {
        // budget exhausted: treat as an invalid instrument rather than
        // guessing at a previous close
        return SessionWindow {
            current: PriceSeries::empty(code),
            previous: PriceSeries::empty(code),
        };
    };

    let previous = match probe_backward(port, code, found_on - Duration::days(1)) {
        Some((series, _)) => series,
        None => PriceSeries::empty(code),
    };

    SessionWindow { current, previous }
}

/// Probe one-day windows starting at `start`, stepping back one day after
/// each empty result. Returns the first non-empty session and the day it
/// was found on, or `None` once the budget is spent.
fn probe_backward(
    port: &dyn PricePort,
    code: &str,
    start: NaiveDate,
) -> Option<(PriceSeries, NaiveDate)> {
    let mut day = start;
    for _ in 0..=MAX_BACKSTEPS {
        let session = port
            .fetch_intraday(code, day)
            .unwrap_or_else(|_| PriceSeries::empty(code));
        if !session.is_empty() {
            return Some((session, day));
        }
        day = day - Duration::days(1);
    }
    None
}
