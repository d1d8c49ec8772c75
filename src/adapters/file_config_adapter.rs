//! INI file configuration adapter.

use crate::domain::error::TickchartError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_date(
        &self,
        section: &str,
        key: &str,
    ) -> Result<Option<NaiveDate>, TickchartError> {
        match self.config.get(section, key) {
            None => Ok(None),
            Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| TickchartError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: "invalid date format (expected YYYY-MM-DD)".into(),
                }),
        }
    }
}
