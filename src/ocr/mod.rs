pub mod correlate;
pub mod engine;
pub mod lines;
pub mod setup;
pub mod tsv;

pub use correlate::{correlate, find_query_line, select_section, Correlation};
pub use engine::{encode_png, recognize_lines, TesseractCli, TextRecognizer};
pub use lines::{group_lines, OcrLine};
pub use setup::ensure_tesseract;
pub use tsv::{normalize_text, parse_tsv, OcrToken};
