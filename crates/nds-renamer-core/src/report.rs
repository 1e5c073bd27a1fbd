/// Run report export.
///
/// A finished `RunSummary` can be written as pretty JSON (the whole summary,
/// counters included) or as CSV with one row per processed ROM.
use crate::error::ReportError;
use crate::renamer::RunSummary;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Flat CSV row; nested outcome details are reduced to labels.
#[derive(Serialize)]
struct CsvRow<'a> {
    path: String,
    identifier: &'a str,
    outcome: &'static str,
    target: String,
    companion: &'static str,
}

/// Write `summary` to `path`, choosing JSON or CSV from the extension.
pub fn write_report(summary: &RunSummary, path: &Path) -> Result<(), ReportError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => write_json(summary, path)?,
        "csv" => write_csv(summary, path)?,
        _ => return Err(ReportError::UnsupportedFormat(path.to_path_buf())),
    }

    info!(
        "Report with {} entries written to {}",
        summary.records.len(),
        path.display()
    );
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, ReportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json(summary: &RunSummary, path: &Path) -> Result<(), ReportError> {
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_csv(summary: &RunSummary, path: &Path) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(create(path)?);
    for record in &summary.records {
        writer.serialize(CsvRow {
            path: record.path.display().to_string(),
            identifier: record.identifier.as_deref().unwrap_or(""),
            outcome: record.outcome.label(),
            target: record
                .outcome
                .target()
                .map(|t| t.display().to_string())
                .unwrap_or_default(),
            companion: record.outcome.companion().map(|c| c.label()).unwrap_or(""),
        })?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
