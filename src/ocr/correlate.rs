//! Correlates a destination label found by OCR with the line's sections.
//!
//! OCR runs on the platform crop, so OCR positions are in the platform
//! frame. Sections are measured on the region crop, so the position is
//! moved into the region frame before the sections are searched.

use crate::error::PipelineError;
use crate::geometry::{Frame, Offset, Platform, Region, RowPos, Section};

use super::lines::OcrLine;
use super::tsv::normalize_text;

/// The OCR line that matched the query and the section it falls in.
#[derive(Debug, Clone)]
pub struct Correlation {
    pub line: OcrLine,
    pub position: RowPos<Region>,
    pub section: Section<Region>,
}

/// Returns the first line whose text contains `query`.
///
/// The query is normalized the same way token text is, so spaces typed in
/// a query never prevent a match.
pub fn find_query_line<'a>(
    lines: &'a [OcrLine],
    query: &str,
) -> Result<&'a OcrLine, PipelineError> {
    let needle = normalize_text(query);
    lines
        .iter()
        .find(|line| line.text.contains(&needle))
        .ok_or_else(|| PipelineError::NoMatch {
            query: query.to_string(),
        })
}

/// Returns the section whose inclusive row range contains `pos`.
pub fn select_section<F: Frame>(
    sections: &[Section<F>],
    pos: RowPos<F>,
) -> Result<Section<F>, PipelineError> {
    sections
        .iter()
        .find(|s| s.contains(pos))
        .copied()
        .ok_or(PipelineError::NoSection { position: pos.value })
}

/// Finds `query` among `lines` and selects the section holding its position.
///
/// `platform_to_region` moves OCR positions into the sections' frame.
pub fn correlate(
    lines: &[OcrLine],
    query: &str,
    sections: &[Section<Region>],
    platform_to_region: Offset<Platform, Region>,
) -> Result<Correlation, PipelineError> {
    let line = find_query_line(lines, query)?;
    let position = platform_to_region.row_pos(RowPos::<Platform>::new(line.top));

    crate::log(&format!(
        "Query {:?} matched OCR line {:?} at platform row {:.1} (region row {:.1})",
        query, line.text, line.top, position.value
    ));

    let section = select_section(sections, position)?;
    Ok(Correlation {
        line: line.clone(),
        position,
        section,
    })
}
