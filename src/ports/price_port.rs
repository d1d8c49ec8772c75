//! Price history port trait.

use crate::domain::error::TickchartError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait PricePort {
    /// Daily bars in the half-open window `[start_date, end_date)`.
    /// Empty when the instrument has no data in the window.
    fn fetch_daily(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TickchartError>;

    /// Minute bars for one calendar day. Empty when the market was closed
    /// or the symbol has no data that day.
    fn fetch_intraday(&self, code: &str, day: NaiveDate)
        -> Result<PriceSeries, TickchartError>;

    /// First day, last day and bar count of the stored daily history.
    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TickchartError>;
}
