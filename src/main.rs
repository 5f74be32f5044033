//! Station Stairs
//!
//! Batch tool that finds the staircase icons next to a chosen destination
//! label on the platform of one transit line, across a directory of
//! station map images.
//!
//! Usage: `station-stairs [config.json]`

mod batch;
mod config;
mod error;
mod geometry;
mod ocr;
mod paths;
mod pipeline;
mod platform;
mod segment;
mod stairs;

use anyhow::Result;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::pipeline::PipelineContext;
use crate::stairs::StairTemplate;

const LOG_FILE_NAME: &str = "station_stairs.log";

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join(LOG_FILE_NAME);
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        let log_msg = format!("[PANIC]{} {}\n", location, msg);
        eprintln!("{}", log_msg);
        let log_path = paths::get_logs_dir().join(LOG_FILE_NAME);
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) {
            let _ = file.write_all(log_msg.as_bytes());
        }
    }));

    // Ensure output directories exist
    paths::ensure_directories()?;

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(paths::get_default_config_path);
    let config = config::load_config(&config_path);

    let template_path = paths::resolve_resource(&config.template_path);
    let template = match StairTemplate::load(&template_path) {
        Ok(template) => template,
        Err(e) => {
            log(&format!(
                "{:#}. Place the stair icon at {} or set template_path in the config",
                e,
                template_path.display()
            ));
            return Err(e);
        }
    };
    log(&format!(
        "Stair template loaded: {}x{}",
        template.width(),
        template.height()
    ));

    let recognizer = match ocr::ensure_tesseract(&config) {
        Ok(recognizer) => recognizer,
        Err(e) => {
            log(&format!("Failed to setup Tesseract: {:#}", e));
            return Err(e);
        }
    };

    let ctx = PipelineContext { config, template };
    let summary = batch::run_batch(&ctx, &recognizer)?;
    if summary.failed > 0 {
        log(&format!(
            "See {} for the failed maps",
            ctx.config.output_dir.join("failures.csv").display()
        ));
    }

    Ok(())
}
