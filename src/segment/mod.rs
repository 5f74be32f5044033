//! Color segmentation and bounding-box extraction.
//!
//! This module provides:
//! - Frame-tagged boolean masks with row-band views
//! - Color-range segmentation with explicit channel-order conversion
//! - Bounding rectangles of segmented pixels

pub mod color;
pub mod mask;
pub mod region;

pub use color::{segment_color, ChannelOrder, ColorRange};
pub use mask::{Mask, MaskRows};
pub use region::bounding_box;
