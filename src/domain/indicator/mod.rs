//! Technical indicator implementations.
//!
//! One module per indicator. Every `calculate_*` function returns series
//! aligned one-to-one by position with its input bars; warm-up positions
//! and arithmetically undefined positions carry `valid == false`, and the
//! numeric payload of an invalid point is meaningless and must not be read.

pub mod ema;
pub mod kdj;
pub mod macd;
pub mod rsi;
pub mod sma;

use chrono::NaiveDateTime;
use std::fmt;

/// A single point in an indicator time series.
#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub timestamp: NaiveDateTime,
    pub valid: bool,
    pub value: f64,
}

/// Indicator identity plus parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    MacdLine {
        fast: usize,
        slow: usize,
    },
    MacdSignal {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    MacdHist {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    StochasticK(usize),
    StochasticD(usize),
    StochasticJ(usize),
}

/// A time series of indicator values, one column of a chart pane.
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of leading invalid positions.
    pub fn warmup_len(&self) -> usize {
        self.values.iter().take_while(|p| !p.valid).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::MacdLine { fast, slow } => write!(f, "MACD({},{})", fast, slow),
            IndicatorType::MacdSignal { fast, slow, signal } => {
                write!(f, "MACDSIGNAL({},{},{})", fast, slow, signal)
            }
            IndicatorType::MacdHist { fast, slow, signal } => {
                write!(f, "MACDHIST({},{},{})", fast, slow, signal)
            }
            IndicatorType::StochasticK(period) => write!(f, "K({})", period),
            IndicatorType::StochasticD(period) => write!(f, "D({})", period),
            IndicatorType::StochasticJ(period) => write!(f, "J({})", period),
        }
    }
}
