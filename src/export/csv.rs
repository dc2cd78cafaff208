//! CSV serialization of the run dataset.
//!
//! Two layouts: the extended 7-column layout carrying point count and
//! repeat, and the compact 6-column batch layout indexed by record
//! position. String fields are written as-is; algorithm names contain no
//! delimiters today and the format makes no attempt to escape them — a
//! known limitation of the contract, not an oversight to fix silently.
//!
//! Floats are written with Rust's shortest-roundtrip formatting so that
//! parsing an exported file reconstructs the exact values.

use crate::error::ExportError;
use crate::harness::dataset::Dataset;

/// Header of the extended (per point count) layout.
pub const EXTENDED_HEADER: &str = "N_Points,Repeat,Algorithm,Distance,Time,ComputeTimeSec";

/// Header of the compact batch layout.
pub const BATCH_HEADER: &str = "Index,Algorithm,Distance,Time,Nodes,ComputeTimeSec";

/// Serialize the dataset in the extended layout, one line per record.
pub fn extended_csv(dataset: &Dataset) -> String {
    let mut out = String::from(EXTENDED_HEADER);
    out.push('\n');
    for record in dataset.records() {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            record.points_n,
            record.iteration,
            record.algorithm,
            record.distance,
            record.time,
            record.compute_time_sec,
        ));
    }
    out
}

/// Serialize the dataset in the compact batch layout.
pub fn batch_csv(dataset: &Dataset) -> String {
    let mut out = String::from(BATCH_HEADER);
    out.push('\n');
    for (index, record) in dataset.records().iter().enumerate() {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            index + 1,
            record.algorithm,
            record.distance,
            record.time,
            record.num_nodes,
            record.compute_time_sec,
        ));
    }
    out
}

/// One parsed row of the extended layout.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub points_n: usize,
    pub iteration: u32,
    pub algorithm: String,
    pub distance: f64,
    pub time: f64,
    pub compute_time_sec: f64,
}

/// Parse extended-layout CSV text back into rows.
pub fn parse_extended_csv(text: &str) -> Result<Vec<CsvRow>, ExportError> {
    let mut lines = text.lines();
    let header = lines.next().unwrap_or_default();
    if header != EXTENDED_HEADER {
        return Err(ExportError::HeaderMismatch {
            expected: EXTENDED_HEADER.to_string(),
            found: header.to_string(),
        });
    }

    let mut rows = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line_no = offset + 2;
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 6 {
            return Err(ExportError::InvalidRow {
                line: line_no,
                message: format!("expected 6 fields, found {}", fields.len()),
            });
        }

        rows.push(CsvRow {
            points_n: parse_field(fields[0], "N_Points", line_no)?,
            iteration: parse_field(fields[1], "Repeat", line_no)?,
            algorithm: fields[2].to_string(),
            distance: parse_field(fields[3], "Distance", line_no)?,
            time: parse_field(fields[4], "Time", line_no)?,
            compute_time_sec: parse_field(fields[5], "ComputeTimeSec", line_no)?,
        });
    }
    Ok(rows)
}

fn parse_field<T: std::str::FromStr>(
    raw: &str,
    field: &str,
    line: usize,
) -> Result<T, ExportError> {
    raw.parse().map_err(|_| ExportError::InvalidRow {
        line,
        message: format!("invalid {} value '{}'", field, raw),
    })
}
