//! Coordinate frames used by the pipeline.
//!
//! Three rectangles coexist while processing one map: the full station map,
//! the crop containing all platforms, and the crop of the single platform the
//! line runs through. Every row/column value is tagged with the frame it was
//! measured in, and moving a value between frames goes through an [`Offset`].

use std::fmt;
use std::marker::PhantomData;

use super::{Bounds, RowPos, Section};

/// Marker trait for coordinate frames.
pub trait Frame: Copy + fmt::Debug + PartialEq + Eq {
    /// Human-readable name used in logs and reports.
    const NAME: &'static str;
}

/// The decoded station map. The global platforms mask shares this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Global;

/// The crop that contains every platform (plus buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region;

/// The crop of the platform the transit line runs through.
/// OCR and the stair search both operate in this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform;

impl Frame for Global {
    const NAME: &'static str = "global";
}

impl Frame for Region {
    const NAME: &'static str = "region";
}

impl Frame for Platform {
    const NAME: &'static str = "platform";
}

/// Translation from frame `Src` to frame `Dst`: `dst = src + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset<Src: Frame, Dst: Frame> {
    pub rows: i64,
    pub cols: i64,
    frames: PhantomData<(Src, Dst)>,
}

impl<Src: Frame, Dst: Frame> Offset<Src, Dst> {
    pub fn new(rows: i64, cols: i64) -> Self {
        Self {
            rows,
            cols,
            frames: PhantomData,
        }
    }

    /// Offset of a crop whose top-left corner sits at `bounds` in the `Dst` frame.
    pub fn crop_origin(bounds: &Bounds<Dst>) -> Self {
        Self::new(bounds.row_min, bounds.col_min)
    }

    pub fn row(&self, row: i64) -> i64 {
        row + self.rows
    }

    pub fn col(&self, col: i64) -> i64 {
        col + self.cols
    }

    pub fn bounds(&self, b: &Bounds<Src>) -> Bounds<Dst> {
        Bounds::new(
            self.row(b.row_min),
            self.row(b.row_max),
            self.col(b.col_min),
            self.col(b.col_max),
        )
    }

    pub fn section(&self, s: &Section<Src>) -> Section<Dst> {
        Section::new(self.row(s.top), self.row(s.bottom))
    }

    pub fn row_pos(&self, pos: RowPos<Src>) -> RowPos<Dst> {
        RowPos::new(pos.value + self.rows as f64)
    }

    pub fn inverse(&self) -> Offset<Dst, Src> {
        Offset::new(-self.rows, -self.cols)
    }

    /// Composes `Src -> Dst` with `Dst -> Next`.
    pub fn then<Next: Frame>(&self, next: Offset<Dst, Next>) -> Offset<Src, Next> {
        Offset::new(self.rows + next.rows, self.cols + next.cols)
    }
}

impl<Src: Frame, Dst: Frame> fmt::Display for Offset<Src, Dst> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {:+} rows, {:+} cols",
            Src::NAME,
            Dst::NAME,
            self.rows,
            self.cols
        )
    }
}
