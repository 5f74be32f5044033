use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

use crate::config::StairsConfig;
use crate::log;
use crate::paths;

use super::engine::TesseractCli;

/// Returns the per-user directory where tessdata may be installed.
pub fn get_user_tessdata_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("station-stairs")
        .join("tessdata")
}

/// Builds the Tesseract recognizer from the configuration.
pub fn ensure_tesseract(config: &StairsConfig) -> Result<TesseractCli> {
    let executable = find_tesseract_executable(config.tesseract_path.as_deref())?;
    let tessdata = find_tessdata_dir(config.tessdata_dir.as_deref(), &config.ocr_language)?;

    log(&format!("Tesseract: {}", executable.display()));
    match &tessdata {
        Some(dir) => log(&format!("tessdata: {}", dir.display())),
        None => log(&format!(
            "No {}.traineddata found locally, relying on Tesseract's default data path",
            config.ocr_language
        )),
    }

    Ok(TesseractCli {
        executable,
        tessdata,
    })
}

/// Finds the Tesseract executable: configured path first, then PATH,
/// then common install locations.
pub fn find_tesseract_executable(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(anyhow!(
            "Configured Tesseract executable not found: {}",
            path.display()
        ));
    }

    if let Ok(output) = std::process::Command::new("tesseract")
        .arg("--version")
        .output()
    {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    let common_paths = [
        "/usr/bin/tesseract",
        "/usr/local/bin/tesseract",
        "/opt/homebrew/bin/tesseract",
        r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    ];

    for path in &common_paths {
        let p = PathBuf::from(path);
        if p.exists() {
            return Ok(p);
        }
    }

    Err(anyhow!("Tesseract not found. Please install Tesseract-OCR."))
}

/// Finds a tessdata directory holding `<language>.traineddata`.
///
/// Search order: configured directory, `TESSDATA_PREFIX` (and its
/// `tessdata` child), `./tessdata`, `<exe_dir>/tessdata`, the per-user
/// data directory. Returns
/// `None` when nothing is found so Tesseract falls back to its own default.
pub fn find_tessdata_dir(configured: Option<&Path>, language: &str) -> Result<Option<PathBuf>> {
    let traineddata = format!("{}.traineddata", language);

    if let Some(dir) = configured {
        if dir.join(&traineddata).exists() {
            return Ok(Some(dir.to_path_buf()));
        }
        return Err(anyhow!(
            "{} not found in configured tessdata directory {}",
            traineddata,
            dir.display()
        ));
    }

    let mut candidates = Vec::new();
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        candidates.push(PathBuf::from(&prefix));
        candidates.push(PathBuf::from(&prefix).join("tessdata"));
    }
    candidates.push(PathBuf::from("tessdata"));
    candidates.push(paths::get_tessdata_dir());
    candidates.push(get_user_tessdata_dir());

    Ok(candidates
        .into_iter()
        .find(|dir| dir.join(&traineddata).exists()))
}
