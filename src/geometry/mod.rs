//! Frame-tagged geometry shared by every pipeline stage.

pub mod bounds;
pub mod frame;

pub use bounds::{Bounds, BoundsRecord, RowPos, Section, SectionRecord};
pub use frame::{Frame, Global, Offset, Platform, Region};
