//! Batch worker loop.
//!
//! Receives station maps from the work queue, runs the pipeline on each,
//! writes the annotated stair image, and sends the result back. An error
//! on one image is reported and the loop moves on to the next.

use std::path::Path;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Mutex;

use crate::batch::queue::ImageWorkItem;
use crate::batch::report::SuccessRecord;
use crate::error::PipelineError;
use crate::ocr::TextRecognizer;
use crate::pipeline::{run_pipeline, PipelineContext};

/// Outcome of one work item.
#[derive(Debug)]
pub struct ImageResult {
    pub item: ImageWorkItem,
    pub outcome: Result<SuccessRecord, PipelineError>,
}

/// Loads, processes, and writes one station map.
///
/// The annotated image is saved under `output_dir` with the input's file name.
pub fn process_image(
    item: &ImageWorkItem,
    ctx: &PipelineContext,
    recognizer: &dyn TextRecognizer,
    output_dir: &Path,
) -> Result<SuccessRecord, PipelineError> {
    let map = image::open(&item.path)?.to_rgb8();
    let outcome = run_pipeline(&item.file_name, &map, &item.query, ctx, recognizer)?;

    let output_path = output_dir.join(&item.file_name);
    outcome.stairs.annotated.save(&output_path)?;
    crate::log(&format!(
        "[{}] {} stair match(es) saved to {}",
        item.file_name,
        outcome.stairs.matches.len(),
        output_path.display()
    ));

    Ok(SuccessRecord::from(&outcome))
}

/// Runs the worker loop until the queue is drained and closed.
///
/// Several workers may share one receiver; each takes the next item in turn.
pub fn run_worker(
    worker_id: usize,
    receiver: &Mutex<Receiver<ImageWorkItem>>,
    results: Sender<ImageResult>,
    ctx: &PipelineContext,
    recognizer: &dyn TextRecognizer,
    output_dir: &Path,
) {
    crate::log(&format!("Worker {} started", worker_id));

    loop {
        let next = match receiver.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => {
                crate::log(&format!("Worker {}: queue lock poisoned, exiting", worker_id));
                break;
            }
        };

        let item = match next {
            Ok(item) => item,
            Err(_) => {
                // Channel closed and drained
                break;
            }
        };

        let waited = chrono::Local::now() - item.queued_at;
        crate::log(&format!(
            "Worker {}: processing {} ({}, queued {}ms ago)",
            worker_id,
            item.file_name,
            item.path.display(),
            waited.num_milliseconds()
        ));

        let outcome = process_image(&item, ctx, recognizer, output_dir);
        if let Err(e) = &outcome {
            crate::log(&format!(
                "Worker {}: {} failed: {} ({})",
                worker_id,
                item.file_name,
                e,
                e.kind()
            ));
        }

        if results.send(ImageResult { item, outcome }).is_err() {
            crate::log(&format!("Worker {}: result channel closed, exiting", worker_id));
            break;
        }
    }

    crate::log(&format!("Worker {} finished", worker_id));
}
