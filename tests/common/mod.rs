#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use tickchart::domain::error::TickchartError;
pub use tickchart::domain::price::{PriceBar, PriceSeries};
use tickchart::ports::price_port::PricePort;

/// In-memory price port with a per-call log for the intraday probes.
pub struct MockPricePort {
    pub daily: HashMap<String, Vec<PriceBar>>,
    pub sessions: HashMap<(String, NaiveDate), Vec<PriceBar>>,
    pub error_days: HashSet<(String, NaiveDate)>,
    pub intraday_calls: RefCell<Vec<NaiveDate>>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            daily: HashMap::new(),
            sessions: HashMap::new(),
            error_days: HashSet::new(),
            intraday_calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_daily(mut self, code: &str, bars: Vec<PriceBar>) -> Self {
        self.daily.insert(code.to_string(), bars);
        self
    }

    pub fn with_session(mut self, code: &str, day: NaiveDate, closes: &[f64]) -> Self {
        self.sessions
            .insert((code.to_string(), day), session_bars(code, day, closes));
        self
    }

    pub fn with_error_day(mut self, code: &str, day: NaiveDate) -> Self {
        self.error_days.insert((code.to_string(), day));
        self
    }

    pub fn intraday_call_count(&self) -> usize {
        self.intraday_calls.borrow().len()
    }

    pub fn probed_days(&self) -> Vec<NaiveDate> {
        self.intraday_calls.borrow().clone()
    }
}

impl PricePort for MockPricePort {
    fn fetch_daily(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TickchartError> {
        let bars = self
            .daily
            .get(code)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.day() >= start_date && b.day() < end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(PriceSeries::new(code.to_string(), bars))
    }

    fn fetch_intraday(
        &self,
        code: &str,
        day: NaiveDate,
    ) -> Result<PriceSeries, TickchartError> {
        self.intraday_calls.borrow_mut().push(day);
        if self.error_days.contains(&(code.to_string(), day)) {
            return Err(TickchartError::DataSource {
                reason: "mock fetch failure".into(),
            });
        }
        let bars = self
            .sessions
            .get(&(code.to_string(), day))
            .cloned()
            .unwrap_or_default();
        Ok(PriceSeries::new(code.to_string(), bars))
    }

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TickchartError> {
        match self.daily.get(code) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.day()).min().unwrap();
                let max = bars.iter().map(|b| b.day()).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily bar at midnight with a small range around the close.
pub fn daily_bar(code: &str, day: NaiveDate, close: f64) -> PriceBar {
    PriceBar {
        code: code.to_string(),
        timestamp: day.and_hms_opt(0, 0, 0).unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// Consecutive daily bars starting at `start`, one per close.
pub fn daily_bars(code: &str, start: NaiveDate, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| daily_bar(code, start + chrono::Duration::days(i as i64), close))
        .collect()
}

/// Minute bars within one session, one per close, starting at 10:00.
pub fn session_bars(code: &str, day: NaiveDate, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            code: code.to_string(),
            timestamp: day.and_hms_opt(10, i as u32, 0).unwrap(),
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: 100,
        })
        .collect()
}
