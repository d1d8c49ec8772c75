//! CSV hand-off for the presentation layer.
//!
//! One row per bar: the raw OHLCV columns, the bar's movement label for
//! candle and volume colouring, then every indicator column aligned by
//! position. Positions inside an indicator's warm-up (or otherwise
//! undefined) are written as empty cells, never as zeros.

use crate::domain::engine::{ChartIndicators, MA_WINDOWS};
use crate::domain::error::TickchartError;
use crate::domain::indicator::IndicatorPoint;
use crate::domain::movement::bar_movement;
use crate::domain::price::PriceSeries;
use std::io;

pub fn write_chart_csv<W: io::Write>(
    writer: W,
    series: &PriceSeries,
    indicators: &ChartIndicators,
) -> Result<(), TickchartError> {
    if indicators.bar_count() != series.len() {
        return Err(TickchartError::DataSource {
            reason: "indicator columns are not aligned with the bar series".into(),
        });
    }

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = ["timestamp", "open", "high", "low", "close", "volume", "movement"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for window in MA_WINDOWS {
        header.push(format!("ma{}", window));
    }
    for name in ["rsi", "macd", "macd_signal", "macd_hist", "k", "d", "j"] {
        header.push(name.to_string());
    }
    wtr.write_record(&header).map_err(csv_error)?;

    for (i, bar) in series.bars.iter().enumerate() {
        let mut row: Vec<String> = vec![
            bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
            bar_movement(bar).to_string(),
        ];
        for ma in &indicators.mas {
            row.push(cell(&ma.values[i]));
        }
        row.push(cell(&indicators.rsi.values[i]));
        row.push(cell(&indicators.macd.line.values[i]));
        row.push(cell(&indicators.macd.signal.values[i]));
        row.push(cell(&indicators.macd.histogram.values[i]));
        row.push(cell(&indicators.kdj.k.values[i]));
        row.push(cell(&indicators.kdj.d.values[i]));
        row.push(cell(&indicators.kdj.j.values[i]));
        wtr.write_record(&row).map_err(csv_error)?;
    }

    wtr.flush()?;
    Ok(())
}

fn cell(point: &IndicatorPoint) -> String {
    if point.valid {
        format!("{:.6}", point.value)
    } else {
        String::new()
    }
}

fn csv_error(err: csv::Error) -> TickchartError {
    TickchartError::DataSource {
        reason: format!("CSV write error: {}", err),
    }
}
