use image::{ImageFormat, RgbImage};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::PipelineError;

use super::lines::{group_lines, OcrLine};
use super::tsv::parse_tsv;

/// External text-recognition service.
///
/// Takes an encoded image and a language code and returns the raw TSV
/// table (`block_num`, `line_num`, `top`, `text`, ...).
pub trait TextRecognizer: Send + Sync {
    fn recognize_tsv(&self, encoded: &[u8], language: &str) -> Result<String, PipelineError>;
}

/// Runs the Tesseract command-line tool, piping PNG bytes through stdin
/// and reading TSV from stdout.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    pub executable: PathBuf,
    /// Exported as `TESSDATA_PREFIX` when set.
    pub tessdata: Option<PathBuf>,
}

impl TextRecognizer for TesseractCli {
    fn recognize_tsv(&self, encoded: &[u8], language: &str) -> Result<String, PipelineError> {
        let mut command = Command::new(&self.executable);
        command
            .args(["stdin", "stdout", "-l", language, "tsv"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(tessdata) = &self.tessdata {
            command.env("TESSDATA_PREFIX", tessdata);
        }

        let mut child = command.spawn().map_err(|e| {
            PipelineError::OcrProcess(format!(
                "failed to start {}: {}",
                self.executable.display(),
                e
            ))
        })?;

        // Feed stdin from another thread so a full stdout pipe cannot stall us.
        let stdin = child.stdin.take();
        let input = encoded.to_vec();
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&input)?;
            }
            Ok(())
        });

        let output = child.wait_with_output().map_err(|e| {
            PipelineError::OcrProcess(format!(
                "failed to read output of {}: {}",
                self.executable.display(),
                e
            ))
        })?;
        let written = writer.join();

        // A process that dies early also breaks the stdin pipe; its exit
        // status and stderr say why.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::OcrProcess(format!(
                "Tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(PipelineError::OcrProcess(format!(
                    "failed to send image to Tesseract: {}",
                    e
                )));
            }
            Err(_) => {
                return Err(PipelineError::OcrProcess("stdin writer panicked".to_string()));
            }
        }

        String::from_utf8(output.stdout)
            .map_err(|e| PipelineError::OcrProcess(format!("TSV output is not UTF-8: {}", e)))
    }
}

/// Encodes an image as PNG for the recognizer.
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Recognizes `img` and returns its grouped text lines.
pub fn recognize_lines(
    recognizer: &dyn TextRecognizer,
    img: &RgbImage,
    language: &str,
) -> Result<Vec<OcrLine>, PipelineError> {
    let encoded = encode_png(img)?;
    let tsv = recognizer.recognize_tsv(&encoded, language)?;
    let tokens = parse_tsv(&tsv)?;
    let lines = group_lines(&tokens);
    crate::log(&format!(
        "OCR: {} tokens in {} lines",
        tokens.len(),
        lines.len()
    ));
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::sync::Mutex;

    /// Returns canned TSV and remembers what it was asked.
    struct CannedRecognizer {
        tsv: String,
        seen: Mutex<Vec<(usize, String)>>,
    }

    impl TextRecognizer for CannedRecognizer {
        fn recognize_tsv(&self, encoded: &[u8], language: &str) -> Result<String, PipelineError> {
            self.seen.lock().unwrap().push((encoded.len(), language.to_string()));
            Ok(self.tsv.clone())
        }
    }

    #[test]
    fn test_encode_png_round_trip() {
        let img = RgbImage::from_fn(7, 5, |x, y| Rgb([x as u8, y as u8, 9]));
        let bytes = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_recognize_lines_with_canned_output() {
        let recognizer = CannedRecognizer {
            tsv: "block_num\tline_num\ttop\ttext\n1\t1\t10\tabc\n1\t1\t14\t高尾\n1\t2\t40\tother\n"
                .to_string(),
            seen: Mutex::new(Vec::new()),
        };
        let img = RgbImage::new(4, 4);
        let lines = recognize_lines(&recognizer, &img, "jpn").unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "abc高尾");
        assert_eq!(lines[0].top, 12.0);

        let seen = recognizer.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0 > 0);
        assert_eq!(seen[0].1, "jpn");
    }

    #[test]
    fn test_missing_executable_is_ocr_error() {
        let cli = TesseractCli {
            executable: PathBuf::from("/nonexistent/tesseract-binary"),
            tessdata: None,
        };
        let result = cli.recognize_tsv(b"not a png", "jpn");
        assert!(matches!(result, Err(PipelineError::OcrProcess(_))));
    }

    /// Writes an executable shell script standing in for Tesseract.
    #[cfg(unix)]
    fn fake_tesseract(dir: &std::path::Path, body: &str) -> TesseractCli {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("tesseract");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        TesseractCli {
            executable: path,
            tessdata: None,
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_before_reading_stdin_is_ocr_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = fake_tesseract(
            dir.path(),
            "echo 'Error opening data file jpn.traineddata' >&2\nexit 1",
        );

        // Large enough to overflow the pipe buffer once the process is gone.
        let input = vec![0u8; 4 * 1024 * 1024];
        match cli.recognize_tsv(&input, "jpn") {
            Err(PipelineError::OcrProcess(msg)) => {
                assert!(msg.contains("jpn.traineddata"), "{}", msg)
            }
            other => panic!("expected OcrProcess, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let cli = fake_tesseract(
            dir.path(),
            "cat > /dev/null\necho \"Failed loading language 'xyz'\" >&2\nexit 3",
        );

        match cli.recognize_tsv(b"png bytes", "xyz") {
            Err(PipelineError::OcrProcess(msg)) => {
                assert!(msg.contains("Failed loading language 'xyz'"), "{}", msg)
            }
            other => panic!("expected OcrProcess, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_run_returns_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let cli = fake_tesseract(
            dir.path(),
            "cat > /dev/null\nprintf 'block_num\\tline_num\\ttop\\ttext\\n1\\t1\\t5\\tabc\\n'",
        );

        let tsv = cli.recognize_tsv(b"png bytes", "jpn").unwrap();
        let tokens = parse_tsv(&tsv).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "abc");
    }
}
