//! Frame-tagged rectangles, sections, and row positions.

use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

use super::Frame;

/// Inclusive axis-aligned rectangle in frame `F`.
///
/// Values are signed: a buffered bounding box may extend past the image
/// edges until it is clamped with [`Bounds::clamp_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds<F: Frame> {
    pub row_min: i64,
    pub row_max: i64,
    pub col_min: i64,
    pub col_max: i64,
    frame: PhantomData<F>,
}

impl<F: Frame> Bounds<F> {
    pub fn new(row_min: i64, row_max: i64, col_min: i64, col_max: i64) -> Self {
        Self {
            row_min,
            row_max,
            col_min,
            col_max,
            frame: PhantomData,
        }
    }

    pub fn height(&self) -> i64 {
        self.row_max - self.row_min + 1
    }

    pub fn width(&self) -> i64 {
        self.col_max - self.col_min + 1
    }

    /// Grows the rectangle by `buffer` on every side.
    pub fn expand(&self, buffer: i64) -> Self {
        Self::new(
            self.row_min - buffer,
            self.row_max + buffer,
            self.col_min - buffer,
            self.col_max + buffer,
        )
    }

    /// Intersects with a `width` x `height` image. `None` if nothing is left.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        let clamped = Self::new(
            self.row_min.max(0),
            self.row_max.min(height as i64 - 1),
            self.col_min.max(0),
            self.col_max.min(width as i64 - 1),
        );
        if clamped.row_min > clamped.row_max || clamped.col_min > clamped.col_max {
            return None;
        }
        Some(clamped)
    }

    /// `(x, y, width, height)` for `image::imageops::crop_imm`.
    /// `None` when the rectangle is empty or starts at a negative index.
    pub fn crop_rect(&self) -> Option<(u32, u32, u32, u32)> {
        if self.row_min < 0 || self.col_min < 0 || self.height() <= 0 || self.width() <= 0 {
            return None;
        }
        Some((
            self.col_min as u32,
            self.row_min as u32,
            self.width() as u32,
            self.height() as u32,
        ))
    }

    pub fn record(&self) -> BoundsRecord {
        BoundsRecord {
            frame: F::NAME,
            row_min: self.row_min,
            row_max: self.row_max,
            col_min: self.col_min,
            col_max: self.col_max,
        }
    }
}

impl<F: Frame> fmt::Display for Bounds<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] rows {}..={}, cols {}..={}",
            F::NAME,
            self.row_min,
            self.row_max,
            self.col_min,
            self.col_max
        )
    }
}

/// Serializable snapshot of a [`Bounds`], frame name included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundsRecord {
    pub frame: &'static str,
    pub row_min: i64,
    pub row_max: i64,
    pub col_min: i64,
    pub col_max: i64,
}

/// One maximal run of marked rows along a sampled column, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<F: Frame> {
    pub top: i64,
    pub bottom: i64,
    frame: PhantomData<F>,
}

impl<F: Frame> Section<F> {
    pub fn new(top: i64, bottom: i64) -> Self {
        Self {
            top,
            bottom,
            frame: PhantomData,
        }
    }

    pub fn contains(&self, pos: RowPos<F>) -> bool {
        self.top as f64 <= pos.value && pos.value <= self.bottom as f64
    }

    pub fn record(&self) -> SectionRecord {
        SectionRecord {
            frame: F::NAME,
            top: self.top,
            bottom: self.bottom,
        }
    }
}

/// Serializable snapshot of a [`Section`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionRecord {
    pub frame: &'static str,
    pub top: i64,
    pub bottom: i64,
}

impl<F: Frame> fmt::Display for Section<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] rows {}..={}", F::NAME, self.top, self.bottom)
    }
}

/// A fractional row position, e.g. the mean `top` of an OCR line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPos<F: Frame> {
    pub value: f64,
    frame: PhantomData<F>,
}

impl<F: Frame> RowPos<F> {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            frame: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Global, Region};

    #[test]
    fn test_expand_and_clamp() {
        let b = Bounds::<Global>::new(10, 90, 0, 99);
        let buffered = b.expand(50);
        assert_eq!(buffered, Bounds::new(-40, 140, -50, 149));

        let clamped = buffered.clamp_to(100, 100).unwrap();
        assert_eq!(clamped, Bounds::new(0, 99, 0, 99));
        assert_eq!(clamped.crop_rect(), Some((0, 0, 100, 100)));
    }

    #[test]
    fn test_clamp_outside_image() {
        let b = Bounds::<Global>::new(120, 130, 0, 10);
        assert!(b.clamp_to(100, 100).is_none());
    }

    #[test]
    fn test_crop_rect_rejects_negative() {
        let b = Bounds::<Region>::new(-1, 5, 0, 5);
        assert!(b.crop_rect().is_none());
    }

    #[test]
    fn test_section_contains_is_inclusive() {
        let s = Section::<Region>::new(10, 20);
        assert!(s.contains(RowPos::new(10.0)));
        assert!(s.contains(RowPos::new(20.0)));
        assert!(s.contains(RowPos::new(15.5)));
        assert!(!s.contains(RowPos::new(20.5)));
        assert!(!s.contains(RowPos::new(9.9)));
    }

    #[test]
    fn test_display_names_frame() {
        let b = Bounds::<Region>::new(1, 2, 3, 4);
        assert_eq!(b.to_string(), "[region] rows 1..=2, cols 3..=4");
        assert_eq!(b.record().frame, "region");
    }
}
