//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! Line = EMA(fast) - EMA(slow)
//! Signal = EMA(signal) of the line
//! Histogram = 2 * (Line - Signal)
//!
//! The three columns warm up independently: the line is defined once the
//! slower EMA is seeded, the signal and histogram once `signal` line values
//! exist on top of that. The doubled histogram is the charting convention
//! downstream panes are drawn against.
//!
//! Default parameters: fast=12, slow=26, signal=9.

use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PriceBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

/// The three aligned MACD columns.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

pub fn calculate_macd(
    bars: &[PriceBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    if fast == 0 || slow == 0 || signal_period == 0 {
        return MacdSeries {
            line: IndicatorSeries {
                indicator_type: IndicatorType::MacdLine { fast, slow },
                values: invalid_column(bars),
            },
            signal: IndicatorSeries {
                indicator_type: IndicatorType::MacdSignal {
                    fast,
                    slow,
                    signal: signal_period,
                },
                values: invalid_column(bars),
            },
            histogram: IndicatorSeries {
                indicator_type: IndicatorType::MacdHist {
                    fast,
                    slow,
                    signal: signal_period,
                },
                values: invalid_column(bars),
            },
        };
    }

    let ema_fast = calculate_ema(bars, fast);
    let ema_slow = calculate_ema(bars, slow);

    let mut line_points = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if ema_fast.values[i].valid && ema_slow.values[i].valid {
            line_points.push(IndicatorPoint {
                timestamp: bar.timestamp,
                valid: true,
                value: ema_fast.values[i].value - ema_slow.values[i].value,
            });
        } else {
            line_points.push(IndicatorPoint {
                timestamp: bar.timestamp,
                valid: false,
                value: 0.0,
            });
        }
    }

    // signal: EMA of the line, seeded with the mean of the first
    // `signal_period` defined line values
    let line_warmup = fast.max(slow) - 1;
    let seed_at = line_warmup + signal_period - 1;
    let k = 2.0 / (signal_period as f64 + 1.0);
    let mut signal_points = Vec::with_capacity(bars.len());
    let mut signal_ema = 0.0;
    let mut sum = 0.0;

    for (i, point) in line_points.iter().enumerate() {
        if i < line_warmup {
            signal_points.push(IndicatorPoint {
                timestamp: point.timestamp,
                valid: false,
                value: 0.0,
            });
        } else if i < seed_at {
            sum += point.value;
            signal_points.push(IndicatorPoint {
                timestamp: point.timestamp,
                valid: false,
                value: 0.0,
            });
        } else if i == seed_at {
            sum += point.value;
            signal_ema = sum / signal_period as f64;
            signal_points.push(IndicatorPoint {
                timestamp: point.timestamp,
                valid: true,
                value: signal_ema,
            });
        } else {
            signal_ema = point.value * k + signal_ema * (1.0 - k);
            signal_points.push(IndicatorPoint {
                timestamp: point.timestamp,
                valid: true,
                value: signal_ema,
            });
        }
    }

    let mut hist_points = Vec::with_capacity(bars.len());
    for i in 0..bars.len() {
        if line_points[i].valid && signal_points[i].valid {
            hist_points.push(IndicatorPoint {
                timestamp: bars[i].timestamp,
                valid: true,
                value: 2.0 * (line_points[i].value - signal_points[i].value),
            });
        } else {
            hist_points.push(IndicatorPoint {
                timestamp: bars[i].timestamp,
                valid: false,
                value: 0.0,
            });
        }
    }

    MacdSeries {
        line: IndicatorSeries {
            indicator_type: IndicatorType::MacdLine { fast, slow },
            values: line_points,
        },
        signal: IndicatorSeries {
            indicator_type: IndicatorType::MacdSignal {
                fast,
                slow,
                signal: signal_period,
            },
            values: signal_points,
        },
        histogram: IndicatorSeries {
            indicator_type: IndicatorType::MacdHist {
                fast,
                slow,
                signal: signal_period,
            },
            values: hist_points,
        },
    }
}

pub fn calculate_macd_default(bars: &[PriceBar]) -> MacdSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

fn invalid_column(bars: &[PriceBar]) -> Vec<IndicatorPoint> {
    bars.iter()
        .map(|b| IndicatorPoint {
            timestamp: b.timestamp,
            valid: false,
            value: 0.0,
        })
        .collect()
}
