//! Domain error types.

/// Top-level error type for tickchart.
///
/// Data absence is not an error anywhere in this crate: an empty
/// [`PriceSeries`](crate::domain::price::PriceSeries) and an invalid
/// indicator point are ordinary values. The variants here cover the outer
/// ring only (configuration, file access, malformed input).
#[derive(Debug, thiserror::Error)]
pub enum TickchartError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("malformed price series for {code}: {reason}")]
    MalformedSeries { code: String, reason: String },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TickchartError> for std::process::ExitCode {
    fn from(err: &TickchartError) -> Self {
        let code: u8 = match err {
            TickchartError::Io(_) => 1,
            TickchartError::ConfigParse { .. }
            | TickchartError::ConfigMissing { .. }
            | TickchartError::ConfigInvalid { .. } => 2,
            TickchartError::DataSource { .. } => 3,
            TickchartError::MalformedSeries { .. } => 4,
            TickchartError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
