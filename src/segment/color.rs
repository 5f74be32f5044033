//! Color-range segmentation.
//!
//! Decoded station maps are RGB (the `image` crate's convention), while a
//! color range may be written in either channel order. Every pixel is
//! converted into the range's order before it is compared.

use image::{GenericImageView, Rgb};
use serde::{Deserialize, Serialize};

use crate::geometry::Frame;

use super::mask::Mask;

/// Order of the three color channels in a pixel or color value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// Reorders `px` (stored in `self` order) into `target` order.
    pub fn convert(self, px: [u8; 3], target: ChannelOrder) -> [u8; 3] {
        if self == target {
            px
        } else {
            [px[2], px[1], px[0]]
        }
    }
}

/// Inclusive per-channel color range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub min: [u8; 3],
    pub max: [u8; 3],
    #[serde(default)]
    pub order: ChannelOrder,
}

impl ColorRange {
    pub fn between(min: [u8; 3], max: [u8; 3], order: ChannelOrder) -> Self {
        Self { min, max, order }
    }

    /// Degenerate range matching exactly one color.
    pub fn exact(color: [u8; 3], order: ChannelOrder) -> Self {
        Self::between(color, color, order)
    }

    /// `px` must already be in this range's channel order.
    pub fn contains(&self, px: [u8; 3]) -> bool {
        (0..3).all(|c| self.min[c] <= px[c] && px[c] <= self.max[c])
    }
}

/// Marks every pixel of `image` whose channels all fall inside `range`.
///
/// `image_order` is the channel order the image's pixels are stored in.
pub fn segment_color<F, I>(
    image: &I,
    image_order: ChannelOrder,
    range: &ColorRange,
    label: &'static str,
) -> Mask<F>
where
    F: Frame,
    I: GenericImageView<Pixel = Rgb<u8>>,
{
    let (width, height) = image.dimensions();
    Mask::from_fn(width, height, label, |x, y| {
        let px = image_order.convert(image.get_pixel(x, y).0, range.order);
        range.contains(px)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Global;
    use image::{imageops, RgbImage};

    const PLATFORM_LO: [u8; 3] = [182, 220, 241];
    const PLATFORM_HI: [u8; 3] = [185, 227, 249];

    #[test]
    fn test_range_is_inclusive() {
        let range = ColorRange::between(PLATFORM_LO, PLATFORM_HI, ChannelOrder::Rgb);
        assert!(range.contains(PLATFORM_LO));
        assert!(range.contains(PLATFORM_HI));
        assert!(range.contains([183, 225, 245]));
        assert!(!range.contains([181, 225, 245]));
        assert!(!range.contains([183, 225, 250]));
    }

    #[test]
    fn test_segment_exact_color() {
        let img = RgbImage::from_fn(4, 4, |x, _| {
            if x < 2 { Rgb([235, 92, 2]) } else { Rgb([0, 0, 0]) }
        });
        let range = ColorRange::exact([235, 92, 2], ChannelOrder::Rgb);
        let mask: Mask<Global> = segment_color(&img, ChannelOrder::Rgb, &range, "line");
        assert_eq!(mask.count(), 8);
        assert!(mask.get(1, 3));
        assert!(!mask.get(2, 3));
    }

    #[test]
    fn test_segment_converts_channel_order() {
        // Pixel data stored BGR, range specified RGB.
        let img = RgbImage::from_pixel(2, 2, Rgb([2, 92, 235]));
        let range = ColorRange::exact([235, 92, 2], ChannelOrder::Rgb);

        let as_bgr: Mask<Global> = segment_color(&img, ChannelOrder::Bgr, &range, "line");
        assert_eq!(as_bgr.count(), 4);

        let as_rgb: Mask<Global> = segment_color(&img, ChannelOrder::Rgb, &range, "line");
        assert_eq!(as_rgb.count(), 0);
    }

    #[test]
    fn test_segment_sub_image_view() {
        let img = RgbImage::from_fn(10, 10, |x, y| {
            if x == 7 && y == 8 { Rgb([235, 92, 2]) } else { Rgb([255, 255, 255]) }
        });
        let view = imageops::crop_imm(&img, 5, 5, 5, 5);
        let range = ColorRange::exact([235, 92, 2], ChannelOrder::Rgb);
        let mask: Mask<Global> = segment_color(&*view, ChannelOrder::Rgb, &range, "line");
        assert_eq!((mask.width(), mask.height()), (5, 5));
        assert!(mask.get(2, 3));
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn test_segmentation_is_idempotent() {
        let img = RgbImage::from_fn(16, 16, |x, y| {
            Rgb([180 + (x % 8) as u8, 218 + y as u8 % 12, 245])
        });
        let range = ColorRange::between(PLATFORM_LO, PLATFORM_HI, ChannelOrder::Rgb);
        let first: Mask<Global> = segment_color(&img, ChannelOrder::Rgb, &range, "platforms");

        // Keep only the matched pixels' original colors, blank the rest.
        let matched = RgbImage::from_fn(16, 16, |x, y| {
            if first.get(x, y) { *img.get_pixel(x, y) } else { Rgb([0, 0, 0]) }
        });
        let second: Mask<Global> = segment_color(&matched, ChannelOrder::Rgb, &range, "platforms");
        assert_eq!(first, second);
        assert!(first.count() > 0);
    }
}
