use crate::geometry::{Frame, Section};

/// Splits the set entries of a column slice into maximal contiguous runs.
///
/// Sections come back ordered by row, never overlap, and together cover
/// every set index exactly once. An all-`false` slice yields no sections.
pub fn split_sections<F: Frame>(column: &[bool]) -> Vec<Section<F>> {
    let mut sections = Vec::new();
    let mut run: Option<(usize, usize)> = None;

    for idx in column.iter().enumerate().filter(|(_, on)| **on).map(|(i, _)| i) {
        run = match run {
            Some((start, last)) if idx == last + 1 => Some((start, idx)),
            Some((start, last)) => {
                sections.push(Section::new(start as i64, last as i64));
                Some((idx, idx))
            }
            None => Some((idx, idx)),
        };
    }

    if let Some((start, last)) = run {
        sections.push(Section::new(start as i64, last as i64));
    }

    sections
}
