//! Batch driver: runs the pipeline over every map in the input directory.
//!
//! This module provides:
//! - The work queue feeding one or more worker threads
//! - Per-image error isolation (a failed map never stops the batch)
//! - The failure CSV and the JSON report

pub mod queue;
pub mod report;
pub mod worker;

pub use queue::{create_work_queue, ImageWorkItem};
pub use report::{export_report, BatchReport, ImageReport};
pub use worker::{process_image, run_worker, ImageResult};

use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::sync::Mutex;
use std::thread;

use crate::ocr::TextRecognizer;
use crate::pipeline::PipelineContext;
use report::{append_failure, reset_failures_csv, ErrorRecord};

/// Counts reported at the end of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Lists files in `dir` with `extension` (case-insensitive), sorted by name.
pub fn list_inputs(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .context(format!("Failed to read input directory: {}", dir.display()))?;

    let mut inputs: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .collect();
    inputs.sort();
    Ok(inputs)
}

/// Processes every map in the configured input directory.
///
/// Only setup problems (unreadable input directory, unwritable output
/// directory) are returned as errors. Failures of individual maps are
/// logged, recorded in `failures.csv` and `report.json`, and counted.
pub fn run_batch(ctx: &PipelineContext, recognizer: &dyn TextRecognizer) -> Result<BatchSummary> {
    let config = &ctx.config;
    let output_dir = config.output_dir.as_path();
    std::fs::create_dir_all(output_dir)
        .context(format!("Failed to create output directory: {}", output_dir.display()))?;
    let failures_path = output_dir.join("failures.csv");
    reset_failures_csv(&failures_path)?;

    let inputs = list_inputs(&config.input_dir, &config.input_extension)?;
    crate::log(&format!(
        "Batch: {} map(s) in {}",
        inputs.len(),
        config.input_dir.display()
    ));

    let (sender, receiver) = create_work_queue();
    for (index, path) in inputs.into_iter().enumerate() {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let query = config.query_for(&file_name).to_string();
        // Receiver is alive until the end of this function
        let _ = sender.send(ImageWorkItem::new(index, path, query));
    }
    drop(sender);

    let receiver = Mutex::new(receiver);
    let (result_tx, result_rx) = channel();
    let workers = config.workers.max(1);

    if workers == 1 {
        run_worker(1, &receiver, result_tx, ctx, recognizer, output_dir);
    } else {
        crate::log(&format!("Batch: starting {} workers", workers));
        thread::scope(|scope| {
            for worker_id in 1..=workers {
                let results = result_tx.clone();
                let receiver = &receiver;
                scope.spawn(move || {
                    run_worker(worker_id, receiver, results, ctx, recognizer, output_dir);
                });
            }
        });
        drop(result_tx);
    }

    let mut results: Vec<ImageResult> = result_rx.iter().collect();
    results.sort_by_key(|r| r.item.index);

    let mut images = Vec::with_capacity(results.len());
    let mut succeeded = 0;
    for ImageResult { item, outcome } in results {
        let (result, error) = match outcome {
            Ok(success) => {
                succeeded += 1;
                (Some(success), None)
            }
            Err(e) => {
                if let Err(write_err) = append_failure(&failures_path, &item.file_name, &e) {
                    crate::log(&format!(
                        "Failed to record failure of {}: {}",
                        item.file_name, write_err
                    ));
                }
                (None, Some(ErrorRecord::from(&e)))
            }
        };
        images.push(ImageReport {
            file: item.file_name,
            query: item.query,
            result,
            error,
        });
    }

    let summary = BatchSummary {
        processed: images.len(),
        succeeded,
        failed: images.len() - succeeded,
    };

    let report = BatchReport {
        generated_at: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        processed: summary.processed,
        succeeded: summary.succeeded,
        failed: summary.failed,
        images,
    };
    let report_path = output_dir.join("report.json");
    if let Err(e) = export_report(&report, &report_path) {
        crate::log(&format!("Failed to write report: {:#}", e));
    }

    crate::log(&format!(
        "Batch finished: {} processed, {} succeeded, {} failed",
        summary.processed, summary.succeeded, summary.failed
    ));

    Ok(summary)
}
