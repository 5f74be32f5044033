//! Platform geometry: the line's platform rows, its columns, and the
//! per-label sections along the line.

pub mod columns;
pub mod line;
pub mod sections;

pub use columns::resolve_platform_columns;
pub use line::{grow_rows, locate_line, LineLocation};
pub use sections::split_sections;
