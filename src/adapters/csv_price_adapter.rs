//! CSV file price history adapter.
//!
//! Daily bars live in `<base>/<CODE>.csv` with
//! `date,open,high,low,close,volume` rows; intraday bars in
//! `<base>/<CODE>_<YYYY-MM-DD>.csv` with a full timestamp in the first
//! column. A missing file is an empty series (market closed, unknown
//! symbol), not an error; a malformed row is.

use crate::domain::error::TickchartError;
use crate::domain::price::{PriceBar, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TickchartError> {
        let base = config.get_string("data", "base_path").ok_or_else(|| {
            TickchartError::ConfigMissing {
                section: "data".into(),
                key: "base_path".into(),
            }
        })?;
        Ok(Self::new(PathBuf::from(base)))
    }

    fn daily_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }

    fn intraday_path(&self, code: &str, day: NaiveDate) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", code, day.format("%Y-%m-%d")))
    }

    fn read_bars(
        &self,
        path: &Path,
        code: &str,
        intraday: bool,
    ) -> Result<Vec<PriceBar>, TickchartError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).map_err(|e| TickchartError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TickchartError::DataSource {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let stamp_str = record.get(0).ok_or_else(|| TickchartError::DataSource {
                reason: format!("missing timestamp column in {}", path.display()),
            })?;
            let timestamp = parse_timestamp(stamp_str, intraday).map_err(|reason| {
                TickchartError::DataSource {
                    reason: format!("{} in {}", reason, path.display()),
                }
            })?;

            bars.push(PriceBar {
                code: code.to_string(),
                timestamp,
                open: number_field(&record, 1, "open", path)?,
                high: number_field(&record, 2, "high", path)?,
                low: number_field(&record, 3, "low", path)?,
                close: number_field(&record, 4, "close", path)?,
                volume: number_field(&record, 5, "volume", path)? as i64,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

fn parse_timestamp(value: &str, intraday: bool) -> Result<NaiveDateTime, String> {
    if intraday {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
            .map_err(|e| format!("invalid timestamp {:?}: {}", value, e))
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|d| d.and_time(NaiveTime::MIN))
            .map_err(|e| format!("invalid date {:?}: {}", value, e))
    }
}

fn number_field(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    path: &Path,
) -> Result<f64, TickchartError> {
    record
        .get(index)
        .ok_or_else(|| TickchartError::DataSource {
            reason: format!("missing {} column in {}", name, path.display()),
        })?
        .parse()
        .map_err(|e| TickchartError::DataSource {
            reason: format!("invalid {} value in {}: {}", name, path.display(), e),
        })
}

impl PricePort for CsvPriceAdapter {
    fn fetch_daily(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TickchartError> {
        let mut bars = self.read_bars(&self.daily_path(code), code, false)?;
        bars.retain(|b| b.day() >= start_date && b.day() < end_date);
        Ok(PriceSeries::new(code.to_string(), bars))
    }

    fn fetch_intraday(
        &self,
        code: &str,
        day: NaiveDate,
    ) -> Result<PriceSeries, TickchartError> {
        let mut bars = self.read_bars(&self.intraday_path(code, day), code, true)?;
        bars.retain(|b| b.day() == day);
        Ok(PriceSeries::new(code.to_string(), bars))
    }

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TickchartError> {
        let bars = self.read_bars(&self.daily_path(code), code, false)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.day(), last.day(), bars.len()))),
            _ => Ok(None),
        }
    }
}
