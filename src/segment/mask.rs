//! Boolean pixel masks tagged with the frame they were computed in.

use image::{GrayImage, Luma};
use std::marker::PhantomData;
use std::ops::Range;

use crate::geometry::Frame;

/// A `width` x `height` grid of booleans; `true` marks a segmented pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask<F: Frame> {
    width: u32,
    height: u32,
    bits: Vec<bool>,
    /// What the mask segments, used in error messages ("platforms", "line").
    label: &'static str,
    frame: PhantomData<F>,
}

impl<F: Frame> Mask<F> {
    /// Creates an all-`false` mask.
    pub fn new(width: u32, height: u32, label: &'static str) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
            label,
            frame: PhantomData,
        }
    }

    /// Builds a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        label: &'static str,
        f: impl Fn(u32, u32) -> bool,
    ) -> Self {
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
            label,
            frame: PhantomData,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.bits[self.index(x, y)]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn row(&self, y: u32) -> &[bool] {
        let start = y as usize * self.width as usize;
        &self.bits[start..start + self.width as usize]
    }

    /// True if any pixel of row `y` is set.
    pub fn row_any(&self, y: u32) -> bool {
        self.row(y).iter().any(|&b| b)
    }

    /// The mask sampled at column `x`, top to bottom.
    pub fn column(&self, x: u32) -> Vec<bool> {
        (0..self.height).map(|y| self.get(x, y)).collect()
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// View over every row.
    pub fn all_rows(&self) -> MaskRows<'_, F> {
        MaskRows {
            mask: self,
            rows: 0..self.height,
        }
    }

    /// View over rows `top..=bottom`, clipped to the mask.
    /// Row indices reported through the view stay in this mask's frame.
    pub fn row_band(&self, top: i64, bottom: i64) -> MaskRows<'_, F> {
        let start = top.clamp(0, self.height as i64) as u32;
        let end = (bottom + 1).clamp(start as i64, self.height as i64) as u32;
        MaskRows {
            mask: self,
            rows: start..end,
        }
    }

    /// Renders the mask as a grayscale image (255 = set) for debug dumps.
    pub fn to_luma(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.get(x, y) { Luma([255]) } else { Luma([0]) }
        })
    }
}

/// A borrowed row-slice of a [`Mask`].
#[derive(Debug, Clone)]
pub struct MaskRows<'a, F: Frame> {
    mask: &'a Mask<F>,
    rows: Range<u32>,
}

impl<'a, F: Frame> MaskRows<'a, F> {
    pub fn mask(&self) -> &'a Mask<F> {
        self.mask
    }

    /// Row indices covered by the view, in the mask's frame.
    pub fn rows(&self) -> Range<u32> {
        self.rows.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
