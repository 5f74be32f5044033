//! Per-image pipeline: from a station map and a destination query to the
//! stair icons on the matching part of the line's platform.
//!
//! Stages run in order and each stage's output is the next one's input:
//! region extraction, line location, platform columns, OCR, section
//! correlation, stair search. Any stage error aborts this image only.

use image::{imageops, RgbImage};
use std::path::Path;

use crate::config::StairsConfig;
use crate::error::PipelineError;
use crate::geometry::{Bounds, Global, Offset, Platform, Region, Section};
use crate::ocr::{correlate, recognize_lines, Correlation, TextRecognizer};
use crate::platform::{locate_line, resolve_platform_columns, split_sections};
use crate::segment::{bounding_box, segment_color, ChannelOrder, Mask};
use crate::stairs::{find_stairs, StairSearch, StairTemplate};

/// Decoded maps are always RGB.
const IMAGE_ORDER: ChannelOrder = ChannelOrder::Rgb;

/// Everything that stays the same across the images of a batch.
pub struct PipelineContext {
    pub config: StairsConfig,
    pub template: StairTemplate,
}

/// Result of a successful run on one map.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// All-platforms region after buffering and clamping.
    pub region: Bounds<Global>,
    /// Bounding box of the line stripe inside the region.
    pub stripe: Bounds<Region>,
    /// The line's platform.
    pub platform: Bounds<Global>,
    pub correlation: Correlation,
    /// The selected section moved into the platform crop.
    pub section_in_platform: Section<Platform>,
    pub stairs: StairSearch,
}

/// Runs every stage on `map`, looking for the label `query`.
///
/// `name` identifies the map in logs and debug dumps.
pub fn run_pipeline(
    name: &str,
    map: &RgbImage,
    query: &str,
    ctx: &PipelineContext,
    recognizer: &dyn TextRecognizer,
) -> Result<PipelineOutcome, PipelineError> {
    let config = &ctx.config;
    crate::log(&format!(
        "[{}] Looking for {:?} ({}x{})",
        name,
        query,
        map.width(),
        map.height()
    ));

    // All platforms, then the buffered region around them.
    let platforms: Mask<Global> =
        segment_color(map, IMAGE_ORDER, &config.platform_range(), "platforms");
    crate::log(&format!("[{}] {} platform pixel(s)", name, platforms.count()));
    let buffered = bounding_box(platforms.all_rows(), config.region_buffer)?;
    let region = buffered
        .clamp_to(map.width(), map.height())
        .ok_or(PipelineError::EmptyMask { what: "region" })?;
    crate::log(&format!("[{}] Region {} (buffered {})", name, region, buffered));

    let (x, y, w, h) = region.crop_rect().ok_or(PipelineError::EmptyMask { what: "region" })?;
    let region_view = imageops::crop_imm(map, x, y, w, h);
    let region_origin = Offset::<Region, Global>::crop_origin(&region);

    // The line's stripe and the platform it sits on.
    let line = locate_line(
        &*region_view,
        IMAGE_ORDER,
        &config.line_range(),
        &platforms,
        region_origin,
    )?;
    let rows = line.platform_rows;
    let (col_min, col_max) = resolve_platform_columns(&platforms, &rows)?;
    let platform = Bounds::<Global>::new(rows.top, rows.bottom, col_min, col_max);
    crate::log(&format!(
        "[{}] Platform {} ({})",
        name,
        platform,
        region_origin.inverse().bounds(&platform)
    ));

    if let Some(dir) = &config.debug_dir {
        dump_masks(dir, name, &platforms, &line.line_mask);
    }

    let (x, y, w, h) = platform
        .crop_rect()
        .ok_or(PipelineError::EmptyMask { what: "platform" })?;
    let platform_image = imageops::crop_imm(map, x, y, w, h).to_image();
    let platform_origin = Offset::<Platform, Global>::crop_origin(&platform);

    // Sections along the stripe's leftmost column, over the full region height.
    let sections = split_sections::<Region>(&line.line_mask.column(line.stripe.col_min as u32));
    crate::log(&format!(
        "[{}] {} section(s) along column {}",
        name,
        sections.len(),
        line.stripe.col_min
    ));

    let lines = recognize_lines(recognizer, &platform_image, &config.ocr_language)?;
    let platform_to_region = platform_origin.then(region_origin.inverse());
    let correlation = correlate(&lines, query, &sections, platform_to_region)?;
    let section_in_platform = platform_to_region.inverse().section(&correlation.section);
    crate::log(&format!(
        "[{}] Selected section {} ({})",
        name, correlation.section, section_in_platform
    ));

    // Stair search from the section's top to the bottom of the platform.
    let top = (section_in_platform.top.max(0) as u32).min(platform_image.height() - 1);
    let sub_image = imageops::crop_imm(
        &platform_image,
        0,
        top,
        platform_image.width(),
        platform_image.height() - top,
    )
    .to_image();
    let stairs = find_stairs(&sub_image, &ctx.template, config.match_threshold, config.outline());

    Ok(PipelineOutcome {
        region,
        stripe: line.stripe,
        platform,
        correlation,
        section_in_platform,
        stairs,
    })
}

/// Writes the platforms and line masks for inspection. Failures are logged only.
fn dump_masks(dir: &Path, name: &str, platforms: &Mask<Global>, line_mask: &Mask<Region>) {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());

    if let Err(e) = std::fs::create_dir_all(dir) {
        crate::log(&format!("Failed to create debug dir {}: {}", dir.display(), e));
        return;
    }

    let dumps = [
        (format!("{}_{}.png", stem, platforms.label()), platforms.to_luma()),
        (format!("{}_{}.png", stem, line_mask.label()), line_mask.to_luma()),
    ];
    for (file_name, img) in dumps {
        let path = dir.join(file_name);
        match img.save(&path) {
            Ok(()) => crate::log(&format!("Debug mask saved: {}", path.display())),
            Err(e) => crate::log(&format!("Failed to save debug mask {}: {}", path.display(), e)),
        }
    }
}
