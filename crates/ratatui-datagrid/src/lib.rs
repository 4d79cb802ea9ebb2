//! `ratatui-datagrid` is a virtualized data grid widget for ratatui.
//!
//! It re-exports [`ratatui_datagrid_core`]; see [`datagrid::view::DataGridView`] for the widget
//! and [`datagrid::navigation`] for the keyboard model.
//!
//! ## Features
//!
//! - `crossterm`: enables [`crossterm_input`] for converting crossterm events.
//!
//! ## Example
//!
//! ```no_run
//! use ratatui_datagrid::datagrid::columns::GridColumn;
//! use ratatui_datagrid::datagrid::view::DataGridView;
//!
//! let mut grid = DataGridView::new();
//! grid.set_columns(vec![
//!     GridColumn::new("id", 6).pinned(),
//!     GridColumn::new("name", 16).editable(),
//! ])
//! .expect("unique column keys");
//! grid.set_row_count(10_000);
//! ```
pub use ratatui_datagrid_core::datagrid;
pub use ratatui_datagrid_core::input;
pub use ratatui_datagrid_core::keymap;
pub use ratatui_datagrid_core::render;
pub use ratatui_datagrid_core::theme;
pub use ratatui_datagrid_core::viewport;

#[cfg(feature = "crossterm")]
pub use ratatui_datagrid_core::crossterm_input;
