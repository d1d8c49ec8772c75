//! Configuration access port trait.

use crate::domain::error::TickchartError;
use chrono::NaiveDate;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// ISO `YYYY-MM-DD` date value. `Ok(None)` when the key is absent;
    /// a present but unparseable value is `ConfigInvalid`.
    fn get_date(
        &self,
        section: &str,
        key: &str,
    ) -> Result<Option<NaiveDate>, TickchartError>;
}
