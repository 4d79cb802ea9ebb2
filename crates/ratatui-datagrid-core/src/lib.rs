//! `ratatui-datagrid-core` provides the building blocks of a virtualized data grid for terminal
//! UIs.
//!
//! The grid renders only the rows and columns inside the viewport, keeps pinned columns fixed
//! while the rest scrolls horizontally, and moves keyboard focus the way spreadsheet users
//! expect: arrows, Home/End, Ctrl+arrows, Tab/Shift+Tab through summary and filter rows, and an
//! edit mode that only stops on editable cells.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No async runtime. A move that needs a scroll completes on the next `render`.
//! - Layout errors are values ([`datagrid::columns::LayoutError`]); navigation decisions are
//!   logged through `tracing` under the `navigation` target.
//!
//! ## Getting started
//!
//! Most users should depend on the facade crate `ratatui-datagrid`. Use this crate directly if
//! you want to drive [`datagrid::navigation::NavigationCoordinator`] from your own grid.
//!
//! Useful entry points:
//! - [`datagrid::view::DataGridView`]: the widget.
//! - [`datagrid::navigation::NavigationCoordinator`]: navigation without the widget.
//! - [`datagrid::virtualization::AxisVirtualizer`]: the scroll container seam.
pub mod theme;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod render;
pub mod viewport;

pub mod datagrid;
pub mod input;
pub mod keymap;
