//! Price bar and series representation.

use crate::domain::error::TickchartError;
use chrono::{NaiveDate, NaiveDateTime};

/// One sampled interval of trading activity. Daily bars carry midnight
/// timestamps; intraday bars carry minute timestamps.
#[derive(Debug, Clone)]
pub struct PriceBar {
    pub code: String,
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    /// Calendar day this bar belongs to.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Ascending, duplicate-free sequence of bars for one instrument.
///
/// The empty series is a legal value meaning "no data for the requested
/// range" (unknown symbol, market holiday, not yet listed).
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub code: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(code: String, bars: Vec<PriceBar>) -> Self {
        Self { code, bars }
    }

    pub fn empty(code: &str) -> Self {
        Self {
            code: code.to_string(),
            bars: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Check the ordering and range invariants, reporting the first
    /// violation. Indicator computation refuses series that fail here.
    pub fn validate(&self) -> Result<(), TickchartError> {
        for (i, bar) in self.bars.iter().enumerate() {
            for (name, value) in [
                ("open", bar.open),
                ("high", bar.high),
                ("low", bar.low),
                ("close", bar.close),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return self.invalid(format!("bar {}: {} is {}", i, name, value));
                }
            }
            if bar.low > bar.high {
                return self.invalid(format!(
                    "bar {}: low {} above high {}",
                    i, bar.low, bar.high
                ));
            }
            if bar.open < bar.low || bar.open > bar.high {
                return self.invalid(format!("bar {}: open outside low..high", i));
            }
            if bar.close < bar.low || bar.close > bar.high {
                return self.invalid(format!("bar {}: close outside low..high", i));
            }
            if bar.volume < 0 {
                return self.invalid(format!("bar {}: negative volume {}", i, bar.volume));
            }
            if i > 0 && bar.timestamp <= self.bars[i - 1].timestamp {
                return self.invalid(format!("bar {}: timestamp not increasing", i));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> Result<(), TickchartError> {
        Err(TickchartError::MalformedSeries {
            code: self.code.clone(),
            reason,
        })
    }
}
