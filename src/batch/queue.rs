//! Work queue for distributing station maps across worker threads.
//!
//! Uses std::sync::mpsc channels: one carries work items to the workers,
//! a second carries results back to the batch driver.

use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

/// A work item for a batch worker.
#[derive(Debug, Clone)]
pub struct ImageWorkItem {
    /// Position in the sorted input listing (0-based)
    pub index: usize,
    /// Path to the station map
    pub path: PathBuf,
    /// File name, also used for the output image
    pub file_name: String,
    /// Destination label to look for
    pub query: String,
    /// Timestamp when the item was queued
    pub queued_at: DateTime<Local>,
}

impl ImageWorkItem {
    pub fn new(index: usize, path: PathBuf, query: String) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            index,
            path,
            file_name,
            query,
            queued_at: Local::now(),
        }
    }
}

/// Creates a new work queue.
///
/// The channel is unbounded: the driver queues every image up front and
/// drops the sender, so workers stop once the queue is drained.
pub fn create_work_queue() -> (Sender<ImageWorkItem>, Receiver<ImageWorkItem>) {
    channel()
}
