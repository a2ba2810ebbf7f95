use crate::error::{ReportError, Result};
use crate::export::write_csv_atomic;
use crate::types::FileReportEntry;
use chrono::{NaiveDateTime, TimeDelta};
use log::debug;
use serde::Serialize;
use std::path::Path;

const PXM_SUFFIX: &str = ".pxm";
// Accepts any fractional precision, and none at all.
const PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntervalRow {
    pub file_name: String,
    pub time_interval: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum IntervalOutcome {
    /// No `.pxm` rows; the report was truncated to zero bytes.
    Cleared,
    Written(usize),
}

/// Rewrites a creation-time report in place as headerless `FileName,TimeInterval` rows
/// covering only `.pxm` captures.
pub fn process_intervals(path: &Path) -> Result<IntervalOutcome> {
    if !path.is_file() {
        return Err(ReportError::MissingReport {
            path: path.to_path_buf(),
        });
    }

    let entries = read_report(path)?;
    let captures: Vec<FileReportEntry> = entries
        .into_iter()
        .filter(|e| e.file_name.ends_with(PXM_SUFFIX))
        .collect();
    debug!("{} {} rows in {}", captures.len(), PXM_SUFFIX, path.display());

    if captures.is_empty() {
        write_csv_atomic(path, |_| Ok(()))?;
        return Ok(IntervalOutcome::Cleared);
    }

    let rows = compute_intervals(&captures, path)?;
    write_csv_atomic(path, |writer| {
        for row in &rows {
            writer.serialize(row)?;
        }
        Ok(())
    })?;

    Ok(IntervalOutcome::Written(rows.len()))
}

fn read_report(path: &Path) -> Result<Vec<FileReportEntry>> {
    let csv_err = |source: csv::Error| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader
        .deserialize::<FileReportEntry>()
        .map(|row| row.map_err(csv_err))
        .collect()
}

/// Seconds elapsed since the previous capture; the first capture has no interval.
pub fn compute_intervals(captures: &[FileReportEntry], source: &Path) -> Result<Vec<IntervalRow>> {
    let mut rows = Vec::with_capacity(captures.len());
    let mut previous: Option<NaiveDateTime> = None;

    for capture in captures {
        let time = NaiveDateTime::parse_from_str(&capture.creation_time, PARSE_FORMAT).map_err(
            |e| ReportError::ParseTimestamp {
                path: source.to_path_buf(),
                value: capture.creation_time.clone(),
                source: e,
            },
        )?;

        let time_interval = previous
            .map(|prev| format_seconds(time - prev))
            .unwrap_or_default();
        previous = Some(time);

        rows.push(IntervalRow {
            file_name: short_name(&capture.file_name).to_string(),
            time_interval,
        });
    }

    Ok(rows)
}

/// `PXMs_04_0000_0003.pxm` -> `0003.pxm`
#[must_use]
pub fn short_name(name: &str) -> &str {
    name.rsplit_once('_').map_or(name, |(_, tail)| tail)
}

fn format_seconds(delta: TimeDelta) -> String {
    let seconds = match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    };

    if seconds.fract() == 0.0 {
        format!("{seconds:.1}")
    } else {
        seconds.to_string()
    }
}
