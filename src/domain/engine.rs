//! Chart indicator set computation.
//!
//! Composes the indicator primitives into the fixed set a chart page
//! draws: the moving-average fan on the price pane, RSI, the MACD columns
//! and the KDJ columns. Everything comes back index-aligned with the
//! input series.

use crate::domain::error::TickchartError;
use crate::domain::indicator::kdj::{self, KdjSeries};
use crate::domain::indicator::macd::{calculate_macd_default, MacdSeries};
use crate::domain::indicator::rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::price::PriceSeries;

/// Moving-average windows drawn on the price pane.
pub const MA_WINDOWS: [usize; 7] = [5, 10, 20, 30, 60, 120, 250];

/// The full indicator set for one chart, aligned with the input series.
#[derive(Debug, Clone)]
pub struct ChartIndicators {
    /// One series per entry of [`MA_WINDOWS`], in the same order.
    pub mas: Vec<IndicatorSeries>,
    pub rsi: IndicatorSeries,
    pub macd: MacdSeries,
    pub kdj: KdjSeries,
}

impl ChartIndicators {
    /// Length shared by every column (equal to the input bar count).
    pub fn bar_count(&self) -> usize {
        self.rsi.len()
    }
}

/// Compute the chart indicator set for a price series.
///
/// The series is validated first; ordering or range violations are
/// rejected before any column is computed. An empty series yields empty
/// columns. Well-formed input cannot fail.
pub fn compute_chart_indicators(
    series: &PriceSeries,
) -> Result<ChartIndicators, TickchartError> {
    series.validate()?;
    let bars = series.bars.as_slice();

    Ok(ChartIndicators {
        mas: MA_WINDOWS
            .iter()
            .map(|&window| calculate_sma(bars, window))
            .collect(),
        rsi: rsi::calculate_rsi(bars, rsi::DEFAULT_PERIOD),
        macd: calculate_macd_default(bars),
        kdj: kdj::calculate_kdj(bars, kdj::DEFAULT_PERIOD),
    })
}
