//! Stair icon detection on the selected part of a platform.
//!
//! This module provides:
//! - The reference icon, loaded once
//! - Normalized cross-correlation template matching
//! - Outlining of every match on a copy of the searched image

pub mod draw;
pub mod matcher;
pub mod template;

pub use draw::{draw_rect, COLOR_MATCH};
pub use matcher::{find_matches, match_template, Match, ScoreMap};
pub use template::StairTemplate;

use image::{Rgb, RgbImage};

/// How matches are outlined on the output image.
#[derive(Debug, Clone, Copy)]
pub struct OutlineStyle {
    pub color: Rgb<u8>,
    pub thickness: u32,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            color: COLOR_MATCH,
            thickness: 2,
        }
    }
}

/// Outcome of searching one image for the stair icon.
///
/// An empty `matches` list is a valid result, not a failure.
#[derive(Debug, Clone)]
pub struct StairSearch {
    /// Copy of the searched image with every match outlined.
    pub annotated: RgbImage,
    pub matches: Vec<Match>,
}

/// Finds every placement of `template` in `image` scoring at least
/// `threshold` and outlines each one with the template's dimensions.
pub fn find_stairs(
    image: &RgbImage,
    template: &StairTemplate,
    threshold: f32,
    style: OutlineStyle,
) -> StairSearch {
    let matches = find_matches(image, template, threshold);
    let mut annotated = image.clone();
    for m in &matches {
        draw_rect(&mut annotated, m.x, m.y, m.width, m.height, style.color, style.thickness);
    }

    crate::log(&format!(
        "Stair search: {} match(es) at threshold {:.2} in {}x{} image",
        matches.len(),
        threshold,
        image.width(),
        image.height()
    ));

    StairSearch { annotated, matches }
}
