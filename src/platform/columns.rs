use crate::error::PipelineError;
use crate::geometry::{Global, Section};
use crate::segment::{bounding_box, Mask};

/// Column span of the platform occupying `rows` in the global platforms mask.
///
/// The mask may hold several disjoint platforms. Restricting it to the row
/// band of the line's platform leaves only that platform's columns.
pub fn resolve_platform_columns(
    platforms: &Mask<Global>,
    rows: &Section<Global>,
) -> Result<(i64, i64), PipelineError> {
    let b = bounding_box(platforms.row_band(rows.top, rows.bottom), 0)?;
    Ok((b.col_min, b.col_max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_columns_ignores_other_platforms() {
        // Upper platform cols 5..=30, lower platform cols 40..=70.
        let platforms = Mask::<Global>::from_fn(80, 60, "platforms", |x, y| {
            ((5..=15).contains(&y) && (5..=30).contains(&x))
                || ((30..=45).contains(&y) && (40..=70).contains(&x))
        });
        let cols = resolve_platform_columns(&platforms, &Section::new(30, 45)).unwrap();
        assert_eq!(cols, (40, 70));

        let cols = resolve_platform_columns(&platforms, &Section::new(5, 15)).unwrap();
        assert_eq!(cols, (5, 30));
    }

    #[test]
    fn test_resolve_columns_empty_band() {
        let platforms = Mask::<Global>::from_fn(10, 10, "platforms", |_, y| y < 3);
        let result = resolve_platform_columns(&platforms, &Section::new(5, 8));
        assert!(matches!(result, Err(PipelineError::EmptyMask { .. })));
    }
}
