//! Virtualized data grid.
//!
//! - [`columns`]: pinned / unpinned column layout with visible indices.
//! - [`rows`]: the logical row sequence (data, group headers, detail rows, group summaries).
//! - [`virtualization`]: per-axis virtualizers and the [`virtualization::AxisVirtualizer`] seam.
//! - [`navigation`]: keyboard navigation that only focuses rendered cells.
//! - [`view`]: the [`view::DataGridView`] widget tying it all together.

pub mod cell;
pub mod columns;
pub mod navigation;
pub mod rows;
pub mod view;
pub mod virtualization;

pub use cell::Coordinate;
