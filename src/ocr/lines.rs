//! Groups OCR tokens into logical text lines.

use serde::Serialize;
use std::collections::HashMap;

use super::tsv::OcrToken;

/// One recognized text line, aggregated from the tokens sharing a
/// `(block_num, line_num)` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrLine {
    pub block_num: i64,
    pub line_num: i64,
    /// Mean `top` of the line's tokens, in pixels of the recognized image.
    pub top: f64,
    /// Token texts concatenated in reading order, without separators.
    pub text: String,
}

/// Aggregates tokens by `(block_num, line_num)`.
///
/// Lines are returned in the order their first token appears in the table.
pub fn group_lines(tokens: &[OcrToken]) -> Vec<OcrLine> {
    let mut lines: Vec<(OcrLine, usize)> = Vec::new();
    let mut index: HashMap<(i64, i64), usize> = HashMap::new();

    for token in tokens {
        let key = (token.block_num, token.line_num);
        match index.get(&key) {
            Some(&i) => {
                let (line, count) = &mut lines[i];
                line.text.push_str(&token.text);
                line.top += token.top;
                *count += 1;
            }
            None => {
                index.insert(key, lines.len());
                lines.push((
                    OcrLine {
                        block_num: token.block_num,
                        line_num: token.line_num,
                        top: token.top,
                        text: token.text.clone(),
                    },
                    1,
                ));
            }
        }
    }

    lines
        .into_iter()
        .map(|(mut line, count)| {
            line.top /= count as f64;
            line
        })
        .collect()
}
