//! Bounding rectangle of the set pixels of a mask.

use crate::error::PipelineError;
use crate::geometry::{Bounds, Frame};

use super::mask::MaskRows;

/// Computes the minimal rectangle containing every set pixel in `rows`,
/// grown by `buffer` on each side.
///
/// Rows and columns are reduced independently. The result is not clamped
/// to the mask; callers crop with [`Bounds::clamp_to`] when the buffer may
/// cross an edge.
///
/// Returns `EmptyMask` when no pixel in the view is set.
pub fn bounding_box<F: Frame>(
    rows: MaskRows<'_, F>,
    buffer: u32,
) -> Result<Bounds<F>, PipelineError> {
    let mask = rows.mask();
    if rows.is_empty() {
        return Err(PipelineError::EmptyMask { what: mask.label() });
    }
    let mut row_range: Option<(u32, u32)> = None;
    let mut col_any = vec![false; mask.width() as usize];

    for y in rows.rows() {
        let mut hit = false;
        for (x, &on) in mask.row(y).iter().enumerate() {
            if on {
                col_any[x] = true;
                hit = true;
            }
        }
        if hit {
            row_range = Some(match row_range {
                Some((first, _)) => (first, y),
                None => (y, y),
            });
        }
    }

    let (row_min, row_max) = row_range.ok_or(PipelineError::EmptyMask { what: mask.label() })?;
    let col_min = col_any.iter().position(|&b| b).unwrap_or_default();
    let col_max = col_any.iter().rposition(|&b| b).unwrap_or_default();

    Ok(Bounds::new(row_min as i64, row_max as i64, col_min as i64, col_max as i64)
        .expand(buffer as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Global;
    use crate::segment::Mask;

    #[test]
    fn test_bounding_box_of_two_blobs() {
        // Two blobs: (2..=3, 5..=6) and (7, 1); the box spans both.
        let mask = Mask::<Global>::from_fn(10, 10, "test", |x, y| {
            ((2..=3).contains(&y) && (5..=6).contains(&x)) || (y == 7 && x == 1)
        });
        let b = bounding_box(mask.all_rows(), 0).unwrap();
        assert_eq!(b, Bounds::new(2, 7, 1, 6));
    }

    #[test]
    fn test_bounding_box_with_buffer_is_not_clamped() {
        let mask = Mask::<Global>::from_fn(10, 10, "test", |x, y| x == 0 && y == 0);
        let b = bounding_box(mask.all_rows(), 3).unwrap();
        assert_eq!(b, Bounds::new(-3, 3, -3, 3));
    }

    #[test]
    fn test_bounding_box_contains_every_set_pixel() {
        let mask =
            Mask::<Global>::from_fn(30, 20, "test", |x, y| (x * 7 + y * 3) % 11 == 0 && x > 4);
        let b = bounding_box(mask.all_rows(), 0).unwrap();
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                if mask.get(x, y) {
                    let (row, col) = (y as i64, x as i64);
                    assert!((b.row_min..=b.row_max).contains(&row));
                    assert!((b.col_min..=b.col_max).contains(&col));
                }
            }
        }
        // Tight: every edge row/column carries a set pixel.
        assert!(mask.row_any(b.row_min as u32));
        assert!(mask.row_any(b.row_max as u32));
        assert!(mask.column(b.col_min as u32).contains(&true));
        assert!(mask.column(b.col_max as u32).contains(&true));
    }

    #[test]
    fn test_bounding_box_on_row_band() {
        // Platform A on rows 0..=4 spans cols 0..=9; platform B on rows 10..=14 spans cols 20..=29.
        let mask = Mask::<Global>::from_fn(40, 20, "platforms", |x, y| {
            (y <= 4 && x <= 9) || ((10..=14).contains(&y) && (20..=29).contains(&x))
        });
        let b = bounding_box(mask.row_band(10, 14), 0).unwrap();
        assert_eq!(b, Bounds::new(10, 14, 20, 29));
    }

    #[test]
    fn test_bounding_box_empty_mask() {
        let mask = Mask::<Global>::new(5, 5, "platforms");
        match bounding_box(mask.all_rows(), 0) {
            Err(PipelineError::EmptyMask { what }) => assert_eq!(what, "platforms"),
            other => panic!("expected EmptyMask, got {:?}", other),
        }
    }
}
