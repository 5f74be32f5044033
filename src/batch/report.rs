//! Batch outputs besides the annotated images.
//!
//! - `failures.csv`: one row per failed image of the current run, appended
//!   as each failure is recorded
//! - `report.json`: per-image results, pretty-printed

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::PipelineError;
use crate::geometry::{BoundsRecord, SectionRecord};
use crate::pipeline::PipelineOutcome;
use crate::stairs::Match;

/// Failure CSV header row.
const CSV_HEADER: &str = "file,error_kind,message";

/// What a successful image produced.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessRecord {
    pub region: BoundsRecord,
    pub stripe: BoundsRecord,
    pub platform: BoundsRecord,
    pub ocr_text: String,
    /// OCR line position in the region frame
    pub ocr_row: f64,
    pub section: SectionRecord,
    pub section_in_platform: SectionRecord,
    pub matches: Vec<Match>,
}

impl From<&PipelineOutcome> for SuccessRecord {
    fn from(outcome: &PipelineOutcome) -> Self {
        Self {
            region: outcome.region.record(),
            stripe: outcome.stripe.record(),
            platform: outcome.platform.record(),
            ocr_text: outcome.correlation.line.text.clone(),
            ocr_row: outcome.correlation.position.value,
            section: outcome.correlation.section.record(),
            section_in_platform: outcome.section_in_platform.record(),
            matches: outcome.stairs.matches.clone(),
        }
    }
}

/// Why an image failed.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub kind: &'static str,
    pub message: String,
}

impl From<&PipelineError> for ErrorRecord {
    fn from(err: &PipelineError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub file: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SuccessRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub images: Vec<ImageReport>,
}

/// Export the batch report to a JSON file.
pub fn export_report(report: &BatchReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create JSON file: {}", output_path.display()))?;

    file.write_all(json.as_bytes())
        .context("Failed to write JSON data")?;

    Ok(())
}

/// Starts a fresh failure CSV holding only the header.
///
/// Called once per batch, so the file lists the failures of the current
/// run only. Rows are then appended as images fail.
pub fn reset_failures_csv(path: &Path) -> Result<()> {
    let mut file = File::create(path).context("Failed to create CSV file")?;
    writeln!(file, "{}", CSV_HEADER).context("Failed to write CSV header")?;
    Ok(())
}

/// Appends one failure row. Opens the file for each write.
pub fn append_failure(path: &Path, file_name: &str, err: &PipelineError) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("Failed to open CSV for append")?;

    let line = format!(
        "{},{},{}",
        csv_field(file_name),
        err.kind(),
        csv_field(&err.to_string())
    );

    writeln!(file, "{}", line).context("Failed to write CSV row")?;
    Ok(())
}

/// Quotes a field if it contains a separator, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reset_csv_creates_header() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("failures.csv");

        reset_failures_csv(&csv_path).unwrap();

        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert!(content.starts_with(CSV_HEADER));
    }

    #[test]
    fn test_reset_csv_drops_previous_run() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("failures.csv");
        std::fs::write(&csv_path, "file,error_kind,message\nold.png,NoMatch,x\n").unwrap();

        reset_failures_csv(&csv_path).unwrap();

        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec![CSV_HEADER]);
    }

    #[test]
    fn test_append_failure_quotes_message() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("failures.csv");
        reset_failures_csv(&csv_path).unwrap();

        let err = PipelineError::NoMatch {
            query: "a,b".to_string(),
        };
        append_failure(&csv_path, "神田.png", &err).unwrap();

        let content = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "神田.png,NoMatch,\"no OCR line contains \"\"a,b\"\"\"");
    }

    #[test]
    fn test_export_report() {
        let report = BatchReport {
            generated_at: "2026-01-01T00:00:00".to_string(),
            processed: 1,
            succeeded: 0,
            failed: 1,
            images: vec![ImageReport {
                file: "a.png".to_string(),
                query: "立川".to_string(),
                result: None,
                error: Some(ErrorRecord::from(&PipelineError::NoSection { position: 12.5 })),
            }],
        };

        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        export_report(&report, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"failed\": 1"));
        assert!(content.contains("\"kind\": \"NoSection\""));
        assert!(!content.contains("\"result\""));
    }
}
