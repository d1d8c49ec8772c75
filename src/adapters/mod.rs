//! Concrete adapter implementations for ports.

pub mod chart_csv;
pub mod csv_price_adapter;
pub mod file_config_adapter;
