//! Dataset export: flat CSV text and chart-ready series.

pub mod chart;
pub mod csv;

pub use chart::{batch_series, extended_series, BatchSeries, ExtendedChart, ExtendedSeries};
pub use csv::{batch_csv, extended_csv, parse_extended_csv, CsvRow};
