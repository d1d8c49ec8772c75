//! KDJ stochastic oscillator.
//!
//! RSV[t] = 100 * (close[t] - min(low, n)) / (max(high, n) - min(low, n))
//! K and D are recursive 1/3-2/3 smoothings of RSV and K respectively,
//! both seeded at 50 before the series starts; J = 3K - 2D.
//!
//! RSV has no value for the first n-1 positions, and none where the
//! n-period high equals the n-period low. The smoothing state holds
//! through such gaps: K and D are invalid there and the recursion resumes
//! from the last defined value, not from the seed.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PriceBar;

pub const DEFAULT_PERIOD: usize = 9;

const SEED: f64 = 50.0;

/// The three aligned stochastic columns.
#[derive(Debug, Clone)]
pub struct KdjSeries {
    pub k: IndicatorSeries,
    pub d: IndicatorSeries,
    pub j: IndicatorSeries,
}

/// Recursive 1/3-2/3 smoother. The held value only moves on defined
/// input, so a gap leaves the recursion exactly where it was.
struct Smoother {
    prev: f64,
}

impl Smoother {
    fn new(seed: f64) -> Self {
        Self { prev: seed }
    }

    fn advance(&mut self, input: f64) -> f64 {
        self.prev = input / 3.0 + self.prev * 2.0 / 3.0;
        self.prev
    }
}

pub fn calculate_kdj(bars: &[PriceBar], period: usize) -> KdjSeries {
    let rsv = if period == 0 {
        vec![None; bars.len()]
    } else {
        raw_stochastic(bars, period)
    };
    let k = smooth(&rsv);
    let d = smooth(&k);

    let mut k_points = Vec::with_capacity(bars.len());
    let mut d_points = Vec::with_capacity(bars.len());
    let mut j_points = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        match (k[i], d[i]) {
            (Some(kv), Some(dv)) => {
                k_points.push(IndicatorPoint {
                    timestamp: bar.timestamp,
                    valid: true,
                    value: kv,
                });
                d_points.push(IndicatorPoint {
                    timestamp: bar.timestamp,
                    valid: true,
                    value: dv,
                });
                j_points.push(IndicatorPoint {
                    timestamp: bar.timestamp,
                    valid: true,
                    value: 3.0 * kv - 2.0 * dv,
                });
            }
            _ => {
                for points in [&mut k_points, &mut d_points, &mut j_points] {
                    points.push(IndicatorPoint {
                        timestamp: bar.timestamp,
                        valid: false,
                        value: 0.0,
                    });
                }
            }
        }
    }

    KdjSeries {
        k: IndicatorSeries {
            indicator_type: IndicatorType::StochasticK(period),
            values: k_points,
        },
        d: IndicatorSeries {
            indicator_type: IndicatorType::StochasticD(period),
            values: d_points,
        },
        j: IndicatorSeries {
            indicator_type: IndicatorType::StochasticJ(period),
            values: j_points,
        },
    }
}

/// Position of each close within its trailing n-bar high/low range.
/// `None` during the warm-up and where the range collapses to a point.
fn raw_stochastic(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    let mut rsv = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if i + 1 < period {
            rsv.push(None);
            continue;
        }
        let window = &bars[i + 1 - period..=i];
        let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let highest = window
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);
        if highest == lowest {
            rsv.push(None);
        } else {
            rsv.push(Some(100.0 * (bar.close - lowest) / (highest - lowest)));
        }
    }

    rsv
}

fn smooth(inputs: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut state = Smoother::new(SEED);
    inputs
        .iter()
        .map(|input| match input {
            Some(value) => Some(state.advance(*value)),
            // the held state is untouched across the gap
            None => None,
        })
        .collect()
}
