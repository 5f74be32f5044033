//! Parser for Tesseract's TSV output.
//!
//! Only the `block_num`, `line_num`, `top` and `text` columns are used.
//! Columns are located by header name, so column order does not matter.

use crate::error::PipelineError;

/// One recognized token (a word, for Tesseract) with its grouping keys.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrToken {
    pub block_num: i64,
    pub line_num: i64,
    /// Top edge of the token, in pixels of the recognized image.
    pub top: f64,
    /// Token text with all whitespace removed. Never empty.
    pub text: String,
}

/// Removes every whitespace character, including full-width spaces.
///
/// CJK output often has spaces inserted between glyphs, so whitespace is
/// dropped entirely rather than trimmed.
pub fn normalize_text(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

struct Columns {
    block_num: usize,
    line_num: usize,
    top: usize,
    text: usize,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, PipelineError> {
        let names: Vec<&str> = header.split('\t').map(str::trim).collect();
        let find = |name: &str| {
            names
                .iter()
                .position(|n| *n == name)
                .ok_or_else(|| {
                    PipelineError::OcrProcess(format!("TSV header has no '{}' column", name))
                })
        };
        Ok(Self {
            block_num: find("block_num")?,
            line_num: find("line_num")?,
            top: find("top")?,
            text: find("text")?,
        })
    }
}

/// Parses TSV text into tokens, in table order.
///
/// Rows whose text is missing or whitespace-only are structural placeholders
/// (page, block, paragraph and line rows) and are discarded.
pub fn parse_tsv(tsv: &str) -> Result<Vec<OcrToken>, PipelineError> {
    let mut lines = tsv.lines();
    let header = lines
        .next()
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| PipelineError::OcrProcess("empty TSV output".to_string()))?;
    let columns = Columns::from_header(header)?;

    let mut tokens = Vec::new();
    for (row_idx, line) in lines.enumerate() {
        let fields: Vec<&str> = line.split('\t').collect();
        let text = match fields.get(columns.text) {
            Some(raw) => normalize_text(raw),
            None => continue,
        };
        if text.is_empty() {
            continue;
        }

        let row_no = row_idx + 2;
        let parse_err = |name: &str, value: &str| {
            PipelineError::OcrProcess(format!(
                "TSV row {}: invalid {} value '{}'",
                row_no, name, value
            ))
        };

        let block = field(&fields, columns.block_num, "block_num", row_no)?;
        let line_no = field(&fields, columns.line_num, "line_num", row_no)?;
        let top = field(&fields, columns.top, "top", row_no)?;

        tokens.push(OcrToken {
            block_num: block.parse().map_err(|_| parse_err("block_num", block))?,
            line_num: line_no.parse().map_err(|_| parse_err("line_num", line_no))?,
            top: top.parse().map_err(|_| parse_err("top", top))?,
            text,
        });
    }

    Ok(tokens)
}

fn field<'a>(
    fields: &[&'a str],
    idx: usize,
    name: &str,
    row_no: usize,
) -> Result<&'a str, PipelineError> {
    fields.get(idx).map(|f| f.trim()).ok_or_else(|| {
        PipelineError::OcrProcess(format!("TSV row {} has no '{}' value", row_no, name))
    })
}
