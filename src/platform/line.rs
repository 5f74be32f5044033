//! Locates the colored transit line and the platform it is drawn on.
//!
//! The line marker is a thin stripe painted over a platform. Its bounding
//! box gives a seed row band, which is then grown outward row by row over
//! the global platforms mask until the platform ends.

use image::{GenericImageView, Rgb};

use crate::error::{GrowDirection, PipelineError};
use crate::geometry::{Bounds, Global, Offset, Region, Section};
use crate::segment::{bounding_box, segment_color, ChannelOrder, ColorRange, Mask};

/// Result of locating the line inside the all-platforms region.
#[derive(Debug, Clone)]
pub struct LineLocation {
    /// Line-color mask over the whole region crop.
    pub line_mask: Mask<Region>,
    /// Bounding box of the stripe itself.
    pub stripe: Bounds<Region>,
    /// Rows of the platform the stripe sits on, after growth.
    pub platform_rows: Section<Global>,
}

/// Finds the line stripe in `region_image` and grows its rows over `platforms`.
///
/// `region_origin` maps region rows into the platforms mask's frame.
pub fn locate_line<I>(
    region_image: &I,
    image_order: ChannelOrder,
    line_color: &ColorRange,
    platforms: &Mask<Global>,
    region_origin: Offset<Region, Global>,
) -> Result<LineLocation, PipelineError>
where
    I: GenericImageView<Pixel = Rgb<u8>>,
{
    let line_mask: Mask<Region> = segment_color(region_image, image_order, line_color, "line");
    let stripe = bounding_box(line_mask.all_rows(), 0)?;

    let seed = Section::<Global>::new(
        region_origin.row(stripe.row_min),
        region_origin.row(stripe.row_max),
    );
    let platform_rows = grow_rows(platforms, seed)?;

    crate::log(&format!(
        "Line stripe {} grown to platform rows {}",
        stripe, platform_rows
    ));

    Ok(LineLocation {
        line_mask,
        stripe,
        platform_rows,
    })
}

/// Extends `seed` up and down while the next row outward has any set pixel.
///
/// The returned band ends on the last set row in each direction. Looking at
/// a row outside the mask means the platform is not fully contained in the
/// image, which is reported as `RowGrowthOutOfRange`.
///
/// Seed rows themselves are never tested, so a seed lying just outside a
/// platform still grows into it.
pub fn grow_rows(
    platforms: &Mask<Global>,
    seed: Section<Global>,
) -> Result<Section<Global>, PipelineError> {
    let height = platforms.height();
    let in_range = |row: i64| (0..height as i64).contains(&row);

    for (row, direction) in [(seed.top, GrowDirection::Up), (seed.bottom, GrowDirection::Down)] {
        if !in_range(row) {
            return Err(PipelineError::RowGrowthOutOfRange { row, height, direction });
        }
    }

    let mut top = seed.top;
    loop {
        let next = top - 1;
        if !in_range(next) {
            return Err(PipelineError::RowGrowthOutOfRange {
                row: next,
                height,
                direction: GrowDirection::Up,
            });
        }
        if !platforms.row_any(next as u32) {
            break;
        }
        top = next;
    }

    let mut bottom = seed.bottom;
    loop {
        let next = bottom + 1;
        if !in_range(next) {
            return Err(PipelineError::RowGrowthOutOfRange {
                row: next,
                height,
                direction: GrowDirection::Down,
            });
        }
        if !platforms.row_any(next as u32) {
            break;
        }
        bottom = next;
    }

    Ok(Section::new(top, bottom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    const LINE: [u8; 3] = [235, 92, 2];
    const PLATFORM: [u8; 3] = [183, 224, 245];

    fn platforms_mask(height: u32, rows: std::ops::RangeInclusive<u32>) -> Mask<Global> {
        Mask::from_fn(60, height, "platforms", |_, y| rows.contains(&y))
    }

    #[test]
    fn test_growth_recovers_platform_rows() {
        // Platform rows 10..=50, stripe rows 20..=25, region starting at row 0.
        let platforms = platforms_mask(80, 10..=50);
        let band = grow_rows(&platforms, Section::new(20, 25)).unwrap();
        assert_eq!((band.top, band.bottom), (10, 50));

        // Independent of where the stripe sits inside the platform.
        let band = grow_rows(&platforms, Section::new(48, 49)).unwrap();
        assert_eq!((band.top, band.bottom), (10, 50));
    }

    #[test]
    fn test_growth_from_seed_outside_platform() {
        // Row 9 has no platform pixel but row 10 does.
        let platforms = platforms_mask(80, 10..=50);
        let band = grow_rows(&platforms, Section::new(9, 9)).unwrap();
        assert_eq!((band.top, band.bottom), (9, 50));

        // Seed with nothing on either side stays as it is.
        let band = grow_rows(&platforms, Section::new(60, 62)).unwrap();
        assert_eq!((band.top, band.bottom), (60, 62));
    }

    #[test]
    fn test_growth_walking_off_the_bottom() {
        let platforms = platforms_mask(40, 10..=39);
        match grow_rows(&platforms, Section::new(20, 25)) {
            Err(PipelineError::RowGrowthOutOfRange { row, height, direction }) => {
                assert_eq!(row, 40);
                assert_eq!(height, 40);
                assert_eq!(direction, GrowDirection::Down);
            }
            other => panic!("expected RowGrowthOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_growth_walking_off_the_top() {
        let platforms = platforms_mask(40, 0..=30);
        match grow_rows(&platforms, Section::new(5, 6)) {
            Err(PipelineError::RowGrowthOutOfRange { row, direction, .. }) => {
                assert_eq!(row, -1);
                assert_eq!(direction, GrowDirection::Up);
            }
            other => panic!("expected RowGrowthOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_locate_line_with_region_offset() {
        // Global image 60x80: platform rows 10..=50, stripe rows 20..=25 over cols 15..=40.
        let img = RgbImage::from_fn(60, 80, |x, y| {
            if (20..=25).contains(&y) && (15..=40).contains(&x) {
                Rgb(LINE)
            } else if (10..=50).contains(&y) {
                Rgb(PLATFORM)
            } else {
                Rgb([255, 255, 255])
            }
        });
        let platforms = platforms_mask(80, 10..=50);

        // Region crop starts at global row 5, col 2.
        let region_bounds = Bounds::<Global>::new(5, 79, 2, 59);
        let (x, y, w, h) = region_bounds.crop_rect().unwrap();
        let view = image::imageops::crop_imm(&img, x, y, w, h);
        let origin = Offset::crop_origin(&region_bounds);

        let loc = locate_line(
            &*view,
            ChannelOrder::Rgb,
            &ColorRange::exact(LINE, ChannelOrder::Rgb),
            &platforms,
            origin,
        )
        .unwrap();

        assert_eq!(loc.stripe, Bounds::new(15, 20, 13, 38));
        assert_eq!((loc.platform_rows.top, loc.platform_rows.bottom), (10, 50));
        assert_eq!(loc.line_mask.height(), 75);
    }

    #[test]
    fn test_locate_line_without_stripe() {
        let img = RgbImage::from_pixel(10, 10, Rgb(PLATFORM));
        let platforms = platforms_mask(10, 0..=9);
        let result = locate_line(
            &img,
            ChannelOrder::Rgb,
            &ColorRange::exact(LINE, ChannelOrder::Rgb),
            &platforms,
            Offset::new(0, 0),
        );
        assert!(matches!(result, Err(PipelineError::EmptyMask { what: "line" })));
    }
}
