//! Keyboard navigation over a virtualized grid.
//!
//! [`NavigationCoordinator`] turns a command and the active [`Coordinate`] into either an
//! immediate focus or a scroll request. Focus only ever lands on something that is rendered:
//! when the target lies outside the rendered chunk, the coordinator asks the relevant
//! [`AxisVirtualizer`] to scroll and parks the focus until the host reports that a *newer*
//! render finished ([`NavigationCoordinator::on_render_complete`]).
//!
//! Every call is a function of the command, the coordinate, and the layout passed in through
//! [`GridContext`]. The only state kept between calls is the active focus and at most one
//! pending scroll. A new request cancels whatever is pending.

use tracing::debug;
use tracing::trace;

use crate::datagrid::cell::Coordinate;
use crate::datagrid::columns::ColumnLayout;
use crate::datagrid::rows::RowKind;
use crate::datagrid::rows::RowSource;
use crate::datagrid::virtualization::AxisVirtualizer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavigationCommand {
    Left,
    Right,
    Up,
    Down,
    /// First column of the active row.
    RowStart,
    /// Last column of the active row.
    RowEnd,
    /// First data row, same column.
    Top,
    /// Last data row, same column.
    Bottom,
    FirstCell,
    LastCell,
    Tab,
    ShiftTab,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalDirection {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Unpinned columns.
    Horizontal,
    /// Body rows.
    Vertical,
}

/// A scroll issued to one of the virtualizers. `index` is in that virtualizer's index space
/// (unpinned column index for [`Axis::Horizontal`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollRequest {
    pub axis: Axis,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusTarget {
    Cell(Coordinate),
    /// A synthetic row (group header, detail) focused as a whole.
    Row(usize),
    /// The filter cell of the column at this visible index.
    FilterCell(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Nothing to do: boundary, missing target, or empty grid.
    None,
    Focus(FocusTarget),
    /// A scroll was issued; the focus follows after the next render.
    ScrollRequested(ScrollRequest),
    /// Tab moved past the last (or Shift+Tab before the first) editable cell of the row being
    /// edited, with no data row to continue in.
    SubmitRowEdit { row: usize, forward: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationPhase {
    Idle,
    ScrollRequested {
        scroll: ScrollRequest,
        requested_at: u64,
    },
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NavigationOptions {
    /// A summary row is rendered below the body, addressed at `row == rows.len()`.
    pub root_summaries: bool,
    /// A filter row is rendered above the body and is reachable with Shift+Tab from `(0, 0)`.
    pub quick_filter: bool,
}

/// Everything a navigation decision reads, borrowed from the host grid for one call.
pub struct GridContext<'a> {
    pub columns: &'a ColumnLayout,
    pub rows: &'a dyn RowSource,
    /// Virtualizer over the unpinned columns.
    pub horizontal: &'a mut dyn AxisVirtualizer,
    /// Virtualizer over the body rows.
    pub vertical: &'a mut dyn AxisVirtualizer,
    /// Body row currently in edit mode.
    pub row_in_edit: Option<usize>,
    /// Generation of the last completed render.
    pub generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Continuation {
    /// Focus a cell once its row is rendered; may chain a horizontal scroll.
    Cell(Coordinate),
    /// Focus a cell after a horizontal scroll.
    ScrolledCell(Coordinate),
    Row(usize),
    LastBodyElement,
    FilterCell(usize),
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    scroll: ScrollRequest,
    requested_at: u64,
    continuation: Continuation,
}

#[derive(Clone, Debug, Default)]
pub struct NavigationCoordinator {
    options: NavigationOptions,
    active: Option<FocusTarget>,
    /// Column to return to when leaving a synthetic row vertically.
    column_memory: usize,
    pending: Option<Pending>,
}

impl NavigationCoordinator {
    pub fn new(options: NavigationOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &NavigationOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: NavigationOptions) {
        self.options = options;
    }

    pub fn active(&self) -> Option<FocusTarget> {
        self.active
    }

    pub fn active_cell(&self) -> Option<Coordinate> {
        match self.active {
            Some(FocusTarget::Cell(c)) => Some(c),
            _ => None,
        }
    }

    pub fn phase(&self) -> NavigationPhase {
        match self.pending {
            Some(p) => NavigationPhase::ScrollRequested {
                scroll: p.scroll,
                requested_at: p.requested_at,
            },
            None => NavigationPhase::Idle,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending focus, if any. Returns whether something was cancelled.
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(p) => {
                debug!(target: "navigation", scroll = ?p.scroll, "pending focus cancelled");
                true
            }
            None => false,
        }
    }

    /// Forgets the active focus and any pending scroll, e.g. after the data changed.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.active = None;
        self.column_memory = 0;
    }

    /// Drops the active focus when it no longer points into the grid. A cell whose row turned
    /// synthetic becomes a row focus, and the other way around.
    pub fn revalidate(&mut self, ctx: &GridContext<'_>) {
        let valid = match self.active {
            None => true,
            Some(FocusTarget::Cell(c)) if self.is_synthetic(ctx, c) => {
                debug!(target: "navigation", row = c.row, "focused cell became a synthetic row");
                self.active = Some(FocusTarget::Row(c.row));
                true
            }
            Some(FocusTarget::Cell(c)) => {
                self.row_exists(ctx, c) && c.column < ctx.columns.len()
            }
            Some(FocusTarget::Row(r)) => match ctx.rows.kind(r) {
                Some(kind) if kind.is_synthetic() => true,
                Some(_) if self.column_memory < ctx.columns.len() => {
                    let coord = self.coordinate_in_row(ctx, r, self.column_memory);
                    debug!(target: "navigation", row = r, "focused row became a cell row");
                    self.active = Some(FocusTarget::Cell(coord));
                    true
                }
                _ => false,
            },
            Some(FocusTarget::FilterCell(col)) => {
                self.options.quick_filter && ctx.columns.column(col).is_some_and(|c| c.filterable)
            }
        };
        if !valid {
            debug!(target: "navigation", active = ?self.active, "active focus no longer valid");
            self.reset();
        }
    }

    /// Runs `command` against the active focus. Without an active focus every command lands on
    /// the first cell.
    pub fn execute(
        &mut self,
        ctx: &mut GridContext<'_>,
        command: NavigationCommand,
    ) -> NavigationOutcome {
        let coord = match self.active {
            None => return self.go_to_first_cell(ctx),
            Some(FocusTarget::FilterCell(col)) => {
                return match command {
                    NavigationCommand::Tab => self.resolve_filter_tab(ctx, col, true),
                    NavigationCommand::ShiftTab => self.resolve_filter_tab(ctx, col, false),
                    _ => NavigationOutcome::None,
                };
            }
            Some(FocusTarget::Row(r)) => Coordinate::new(r, self.column_memory),
            Some(FocusTarget::Cell(c)) => c,
        };
        trace!(target: "navigation", ?command, ?coord, "execute");
        match command {
            NavigationCommand::Left => {
                self.resolve_horizontal(ctx, HorizontalDirection::Left, coord)
            }
            NavigationCommand::Right => {
                self.resolve_horizontal(ctx, HorizontalDirection::Right, coord)
            }
            NavigationCommand::Up => self.resolve_vertical(ctx, VerticalDirection::Up, coord),
            NavigationCommand::Down => self.resolve_vertical(ctx, VerticalDirection::Down, coord),
            NavigationCommand::RowStart => self.resolve_row_start(ctx, coord),
            NavigationCommand::RowEnd => self.resolve_row_end(ctx, coord),
            NavigationCommand::Top => self.navigate_top(ctx, coord.column),
            NavigationCommand::Bottom => self.navigate_bottom(ctx, coord.column),
            NavigationCommand::FirstCell => self.go_to_first_cell(ctx),
            NavigationCommand::LastCell => self.go_to_last_cell(ctx),
            NavigationCommand::Tab => self.resolve_tab(ctx, coord),
            NavigationCommand::ShiftTab => self.resolve_shift_tab(ctx, coord),
        }
    }

    /// Focuses `coordinate`, scrolling it into view first when needed.
    pub fn focus_coordinate(
        &mut self,
        ctx: &mut GridContext<'_>,
        coordinate: Coordinate,
    ) -> NavigationOutcome {
        self.supersede();
        if coordinate.column >= ctx.columns.len() {
            return NavigationOutcome::None;
        }
        self.move_to_row(ctx, coordinate.row, coordinate.column)
    }

    pub fn resolve_horizontal(
        &mut self,
        ctx: &mut GridContext<'_>,
        direction: HorizontalDirection,
        coordinate: Coordinate,
    ) -> NavigationOutcome {
        self.supersede();
        let Some(last) = ctx.columns.last_visible_index() else {
            return NavigationOutcome::None;
        };
        if !self.row_exists(ctx, coordinate) || self.is_synthetic(ctx, coordinate) {
            return NavigationOutcome::None;
        }
        let next = match direction {
            HorizontalDirection::Left => coordinate.column.checked_sub(1),
            HorizontalDirection::Right => (coordinate.column < last).then(|| coordinate.column + 1),
        };
        let Some(next) = next else {
            return NavigationOutcome::None;
        };
        if ctx.columns.region(coordinate.column) != ctx.columns.region(next) {
            trace!(
                target: "navigation",
                from = coordinate.column,
                to = next,
                boundary = ctx.columns.is_boundary(coordinate.column)
                    || ctx.columns.is_boundary(next),
                "crossing pinned region"
            );
        }
        self.focus_cell(ctx, coordinate.with_column(next))
    }

    pub fn resolve_vertical(
        &mut self,
        ctx: &mut GridContext<'_>,
        direction: VerticalDirection,
        coordinate: Coordinate,
    ) -> NavigationOutcome {
        self.supersede();
        if ctx.rows.is_empty() || ctx.vertical.count() == 0 {
            return NavigationOutcome::None;
        }
        if coordinate.row >= ctx.rows.len() {
            return NavigationOutcome::None;
        }
        let next = match direction {
            VerticalDirection::Up => coordinate.row.checked_sub(1),
            VerticalDirection::Down => {
                (coordinate.row + 1 < ctx.rows.len()).then(|| coordinate.row + 1)
            }
        };
        let Some(next) = next else {
            return NavigationOutcome::None;
        };
        self.move_to_row(ctx, next, coordinate.column)
    }

    pub fn resolve_tab(
        &mut self,
        ctx: &mut GridContext<'_>,
        coordinate: Coordinate,
    ) -> NavigationOutcome {
        self.supersede();
        let Some(last) = ctx.columns.last_visible_index() else {
            return NavigationOutcome::None;
        };
        if !self.row_exists(ctx, coordinate) {
            return NavigationOutcome::None;
        }
        if self.is_root_summary(ctx, coordinate) {
            if coordinate.column >= last {
                return NavigationOutcome::None;
            }
            return self.resolve_horizontal(ctx, HorizontalDirection::Right, coordinate);
        }
        if ctx.row_in_edit == Some(coordinate.row) {
            return self.tab_editable(ctx, coordinate, true);
        }
        let is_last_row = coordinate.row + 1 == ctx.rows.len();
        if self.is_synthetic(ctx, coordinate) || coordinate.column >= last {
            if !is_last_row {
                return self.move_to_row(ctx, coordinate.row + 1, 0);
            }
            if self.options.root_summaries {
                let summary = Coordinate::summary(ctx.rows.len(), 0);
                return self.focus_cell(ctx, summary);
            }
            return NavigationOutcome::None;
        }
        self.resolve_horizontal(ctx, HorizontalDirection::Right, coordinate)
    }

    pub fn resolve_shift_tab(
        &mut self,
        ctx: &mut GridContext<'_>,
        coordinate: Coordinate,
    ) -> NavigationOutcome {
        self.supersede();
        let Some(last) = ctx.columns.last_visible_index() else {
            return NavigationOutcome::None;
        };
        if !self.row_exists(ctx, coordinate) {
            return NavigationOutcome::None;
        }
        if self.is_root_summary(ctx, coordinate) {
            if coordinate.column == 0 {
                if ctx.rows.is_empty() {
                    return NavigationOutcome::None;
                }
                return self.go_to_last_body_element(ctx);
            }
            return self.resolve_horizontal(ctx, HorizontalDirection::Left, coordinate);
        }
        if ctx.row_in_edit == Some(coordinate.row) {
            return self.tab_editable(ctx, coordinate, false);
        }
        if self.is_synthetic(ctx, coordinate) || coordinate.column == 0 {
            if coordinate.row == 0 {
                if self.options.quick_filter {
                    return self.focus_filter_row(ctx, false);
                }
                return NavigationOutcome::None;
            }
            return self.move_to_row(ctx, coordinate.row - 1, last);
        }
        self.resolve_horizontal(ctx, HorizontalDirection::Left, coordinate)
    }

    pub fn resolve_row_start(
        &mut self,
        ctx: &mut GridContext<'_>,
        coordinate: Coordinate,
    ) -> NavigationOutcome {
        self.supersede();
        if ctx.columns.is_empty()
            || !self.row_exists(ctx, coordinate)
            || self.is_synthetic(ctx, coordinate)
        {
            return NavigationOutcome::None;
        }
        self.focus_cell(ctx, coordinate.with_column(0))
    }

    pub fn resolve_row_end(
        &mut self,
        ctx: &mut GridContext<'_>,
        coordinate: Coordinate,
    ) -> NavigationOutcome {
        self.supersede();
        let Some(last) = ctx.columns.last_visible_index() else {
            return NavigationOutcome::None;
        };
        if !self.row_exists(ctx, coordinate) || self.is_synthetic(ctx, coordinate) {
            return NavigationOutcome::None;
        }
        self.focus_cell(ctx, coordinate.with_column(last))
    }

    /// First data row, keeping `column`.
    pub fn navigate_top(&mut self, ctx: &mut GridContext<'_>, column: usize) -> NavigationOutcome {
        self.supersede();
        let Some(target) = self.first_data_row(ctx) else {
            return NavigationOutcome::None;
        };
        let column = column.min(ctx.columns.last_visible_index().unwrap_or(0));
        self.move_to_row(ctx, target, column)
    }

    /// Last data row, keeping `column`.
    pub fn navigate_bottom(
        &mut self,
        ctx: &mut GridContext<'_>,
        column: usize,
    ) -> NavigationOutcome {
        self.supersede();
        let Some(target) = self.last_data_row(ctx) else {
            return NavigationOutcome::None;
        };
        let column = column.min(ctx.columns.last_visible_index().unwrap_or(0));
        self.move_to_row(ctx, target, column)
    }

    pub fn go_to_first_cell(&mut self, ctx: &mut GridContext<'_>) -> NavigationOutcome {
        self.supersede();
        if ctx.columns.is_empty() {
            return NavigationOutcome::None;
        }
        let Some(target) = self.first_data_row(ctx) else {
            return NavigationOutcome::None;
        };
        let coord = self.coordinate_in_row(ctx, target, 0);
        if self.row_in_view(ctx, target) {
            return self.focus_column(ctx, coord);
        }
        ctx.vertical.scroll_to(target);
        self.arm(ctx, Axis::Vertical, target, Continuation::Cell(coord))
    }

    pub fn go_to_last_cell(&mut self, ctx: &mut GridContext<'_>) -> NavigationOutcome {
        self.supersede();
        let Some(last) = ctx.columns.last_visible_index() else {
            return NavigationOutcome::None;
        };
        let Some(target) = self.last_data_row(ctx) else {
            return NavigationOutcome::None;
        };
        let coord = self.coordinate_in_row(ctx, target, last);
        if self.row_in_view(ctx, target) {
            return self.focus_column(ctx, coord);
        }
        ctx.vertical.scroll_to(target);
        self.arm(ctx, Axis::Vertical, target, Continuation::Cell(coord))
    }

    /// Moves focus into the filter row: its first filterable unpinned cell when `to_start`,
    /// otherwise its last.
    pub fn focus_filter_row(
        &mut self,
        ctx: &mut GridContext<'_>,
        to_start: bool,
    ) -> NavigationOutcome {
        self.supersede();
        let candidates = ctx.columns.unpinned_filterable();
        let candidates = if candidates.is_empty() {
            ctx.columns.filterable()
        } else {
            candidates
        };
        let target = if to_start {
            candidates.first()
        } else {
            candidates.last()
        };
        match target {
            Some(&column) => self.focus_filter_cell(ctx, column),
            None => NavigationOutcome::None,
        }
    }

    /// Tab / Shift+Tab between filter cells. Tabbing past the last filter cell enters the
    /// body (or the root summary when the body is empty).
    pub fn resolve_filter_tab(
        &mut self,
        ctx: &mut GridContext<'_>,
        column: usize,
        forward: bool,
    ) -> NavigationOutcome {
        self.supersede();
        let filterable = ctx.columns.filterable();
        let Some(pos) = filterable.iter().position(|&c| c == column) else {
            return NavigationOutcome::None;
        };
        if forward {
            if let Some(&next) = filterable.get(pos + 1) {
                return self.focus_filter_cell(ctx, next);
            }
            if self.first_data_row(ctx).is_some() {
                return self.go_to_first_cell(ctx);
            }
            if self.options.root_summaries && !ctx.columns.is_empty() {
                let summary = Coordinate::summary(ctx.rows.len(), 0);
                return self.focus_cell(ctx, summary);
            }
            NavigationOutcome::None
        } else {
            match pos.checked_sub(1) {
                Some(prev) => self.focus_filter_cell(ctx, filterable[prev]),
                None => NavigationOutcome::None,
            }
        }
    }

    /// Resolves the pending focus once a render newer than the scroll request completed.
    ///
    /// `ctx.generation` must be the generation of the render that just finished. Renders that
    /// were already current when the scroll was issued are ignored.
    pub fn on_render_complete(&mut self, ctx: &mut GridContext<'_>) -> NavigationOutcome {
        let Some(pending) = self.pending.take() else {
            return NavigationOutcome::None;
        };
        if ctx.generation <= pending.requested_at {
            self.pending = Some(pending);
            return NavigationOutcome::None;
        }
        trace!(
            target: "navigation",
            generation = ctx.generation,
            continuation = ?pending.continuation,
            "render complete"
        );
        let outcome = self.resume(ctx, pending.continuation);
        if outcome == NavigationOutcome::None {
            debug!(
                target: "navigation",
                continuation = ?pending.continuation,
                "pending target not rendered, dropped"
            );
        }
        outcome
    }

    fn resume(
        &mut self,
        ctx: &mut GridContext<'_>,
        continuation: Continuation,
    ) -> NavigationOutcome {
        match continuation {
            Continuation::Cell(coord) => {
                if !self.row_rendered(ctx, coord.row) {
                    return NavigationOutcome::None;
                }
                self.focus_column(ctx, coord)
            }
            Continuation::ScrolledCell(coord) => {
                if !self.row_rendered(ctx, coord.row) || !self.column_rendered(ctx, coord.column)
                {
                    return NavigationOutcome::None;
                }
                self.apply(FocusTarget::Cell(coord))
            }
            Continuation::Row(row) => {
                if !self.row_rendered(ctx, row) {
                    return NavigationOutcome::None;
                }
                self.apply(FocusTarget::Row(row))
            }
            Continuation::LastBodyElement => {
                let Some(row) = ctx.rows.len().checked_sub(1) else {
                    return NavigationOutcome::None;
                };
                if !self.row_rendered(ctx, row) {
                    return NavigationOutcome::None;
                }
                self.last_body_element_in_view(ctx, row)
            }
            Continuation::FilterCell(column) => {
                if !self.column_rendered(ctx, column) {
                    return NavigationOutcome::None;
                }
                self.apply(FocusTarget::FilterCell(column))
            }
        }
    }

    /// Moves to `row`, keeping `column` for cell rows. Scrolls vertically first when the row
    /// does not fit the viewport.
    fn move_to_row(
        &mut self,
        ctx: &mut GridContext<'_>,
        row: usize,
        column: usize,
    ) -> NavigationOutcome {
        if self.is_root_summary_row(ctx, row) {
            return self.focus_cell(ctx, Coordinate::summary(row, column));
        }
        let Some(kind) = ctx.rows.kind(row) else {
            return NavigationOutcome::None;
        };
        // Offsets are read fresh: a previous scroll may have moved the container.
        if self.row_in_view(ctx, row) {
            if kind.is_synthetic() {
                return self.apply(FocusTarget::Row(row));
            }
            let coord = self.coordinate_in_row(ctx, row, column);
            return self.focus_column(ctx, coord);
        }
        ctx.vertical.scroll_to(row);
        let continuation = if kind.is_synthetic() {
            Continuation::Row(row)
        } else {
            Continuation::Cell(self.coordinate_in_row(ctx, row, column))
        };
        self.arm(ctx, Axis::Vertical, row, continuation)
    }

    /// Focuses a cell, scrolling its row into view first when it has left the viewport (the
    /// body may have been scrolled without moving focus).
    fn focus_cell(&mut self, ctx: &mut GridContext<'_>, coord: Coordinate) -> NavigationOutcome {
        if !self.row_in_view(ctx, coord.row) {
            return self.move_to_row(ctx, coord.row, coord.column);
        }
        self.focus_column(ctx, coord)
    }

    /// Focuses a cell whose row is in view, scrolling horizontally when the column is not.
    fn focus_column(&mut self, ctx: &mut GridContext<'_>, coord: Coordinate) -> NavigationOutcome {
        if self.is_synthetic(ctx, coord) {
            return self.apply(FocusTarget::Row(coord.row));
        }
        if self.column_visible(ctx, coord.column) {
            return self.apply(FocusTarget::Cell(coord));
        }
        let Some(unpinned) = ctx.columns.unpinned_index(coord.column) else {
            return NavigationOutcome::None;
        };
        ctx.horizontal.scroll_to(unpinned);
        self.arm(ctx, Axis::Horizontal, unpinned, Continuation::ScrolledCell(coord))
    }

    fn focus_filter_cell(
        &mut self,
        ctx: &mut GridContext<'_>,
        column: usize,
    ) -> NavigationOutcome {
        if self.column_visible(ctx, column) {
            return self.apply(FocusTarget::FilterCell(column));
        }
        let Some(unpinned) = ctx.columns.unpinned_index(column) else {
            return NavigationOutcome::None;
        };
        ctx.horizontal.scroll_to(unpinned);
        self.arm(ctx, Axis::Horizontal, unpinned, Continuation::FilterCell(column))
    }

    fn tab_editable(
        &mut self,
        ctx: &mut GridContext<'_>,
        coord: Coordinate,
        forward: bool,
    ) -> NavigationOutcome {
        let in_row = if forward {
            ctx.columns.next_editable(coord.column + 1, true)
        } else {
            coord
                .column
                .checked_sub(1)
                .and_then(|c| ctx.columns.next_editable(c, false))
        };
        if let Some(column) = in_row {
            return self.focus_cell(ctx, coord.with_column(column));
        }
        let next_row = ctx.rows.adjacent_data_row(coord.row, forward);
        let next_column = if forward {
            ctx.columns.first_editable()
        } else {
            ctx.columns.last_editable()
        };
        match (next_row, next_column) {
            (Some(row), Some(column)) => self.move_to_row(ctx, row, column),
            _ => {
                debug!(target: "navigation", row = coord.row, forward, "row edit submit");
                NavigationOutcome::SubmitRowEdit {
                    row: coord.row,
                    forward,
                }
            }
        }
    }

    fn go_to_last_body_element(&mut self, ctx: &mut GridContext<'_>) -> NavigationOutcome {
        let Some(row) = ctx.rows.len().checked_sub(1) else {
            return NavigationOutcome::None;
        };
        if self.row_in_view(ctx, row) {
            return self.last_body_element_in_view(ctx, row);
        }
        ctx.vertical.scroll_to(row);
        self.arm(ctx, Axis::Vertical, row, Continuation::LastBodyElement)
    }

    fn last_body_element_in_view(
        &mut self,
        ctx: &mut GridContext<'_>,
        row: usize,
    ) -> NavigationOutcome {
        match ctx.rows.kind(row) {
            Some(kind) if kind.is_synthetic() => self.apply(FocusTarget::Row(row)),
            Some(_) => {
                let Some(last) = ctx.columns.last_visible_index() else {
                    return NavigationOutcome::None;
                };
                let coord = self.coordinate_in_row(ctx, row, last);
                self.focus_column(ctx, coord)
            }
            None => NavigationOutcome::None,
        }
    }

    fn arm(
        &mut self,
        ctx: &GridContext<'_>,
        axis: Axis,
        index: usize,
        continuation: Continuation,
    ) -> NavigationOutcome {
        let scroll = ScrollRequest { axis, index };
        debug!(
            target: "navigation",
            ?scroll,
            generation = ctx.generation,
            "scroll requested, focus deferred"
        );
        self.pending = Some(Pending {
            scroll,
            requested_at: ctx.generation,
            continuation,
        });
        NavigationOutcome::ScrollRequested(scroll)
    }

    fn apply(&mut self, target: FocusTarget) -> NavigationOutcome {
        if let FocusTarget::Cell(c) = target {
            self.column_memory = c.column;
        }
        self.active = Some(target);
        trace!(target: "navigation", ?target, "focus");
        NavigationOutcome::Focus(target)
    }

    fn supersede(&mut self) {
        if let Some(p) = self.pending.take() {
            debug!(target: "navigation", scroll = ?p.scroll, "pending focus superseded");
        }
    }

    fn column_visible(&self, ctx: &GridContext<'_>, column: usize) -> bool {
        if ctx.columns.is_pinned(column) {
            return true;
        }
        ctx.columns
            .unpinned_index(column)
            .is_some_and(|u| ctx.horizontal.is_in_view(u))
    }

    fn row_in_view(&self, ctx: &GridContext<'_>, row: usize) -> bool {
        self.is_root_summary_row(ctx, row) || ctx.vertical.is_in_view(row)
    }

    fn column_rendered(&self, ctx: &GridContext<'_>, column: usize) -> bool {
        if ctx.columns.is_pinned(column) {
            return true;
        }
        ctx.columns
            .unpinned_index(column)
            .is_some_and(|u| ctx.horizontal.is_rendered(u))
    }

    fn row_rendered(&self, ctx: &GridContext<'_>, row: usize) -> bool {
        self.is_root_summary_row(ctx, row) || ctx.vertical.is_rendered(row)
    }

    fn row_exists(&self, ctx: &GridContext<'_>, coord: Coordinate) -> bool {
        coord.row < ctx.rows.len() || self.is_root_summary(ctx, coord)
    }

    fn is_root_summary(&self, ctx: &GridContext<'_>, coord: Coordinate) -> bool {
        coord.is_summary_row && self.is_root_summary_row(ctx, coord.row)
    }

    fn is_root_summary_row(&self, ctx: &GridContext<'_>, row: usize) -> bool {
        self.options.root_summaries && row == ctx.rows.len()
    }

    fn is_synthetic(&self, ctx: &GridContext<'_>, coord: Coordinate) -> bool {
        ctx.rows.kind(coord.row).is_some_and(RowKind::is_synthetic)
    }

    fn coordinate_in_row(&self, ctx: &GridContext<'_>, row: usize, column: usize) -> Coordinate {
        Coordinate {
            row,
            column,
            is_summary_row: ctx.rows.kind(row).is_some_and(RowKind::is_summary),
        }
    }

    fn first_data_row(&self, ctx: &GridContext<'_>) -> Option<usize> {
        if ctx.vertical.count() == 0 {
            return None;
        }
        ctx.rows.first_data_row()
    }

    fn last_data_row(&self, ctx: &GridContext<'_>) -> Option<usize> {
        if ctx.vertical.count() == 0 {
            return None;
        }
        ctx.rows.last_data_row()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datagrid::columns::GridColumn;
    use crate::datagrid::columns::PinningPosition;
    use crate::datagrid::rows::GridRow;
    use crate::datagrid::rows::GridRows;
    use crate::datagrid::virtualization::VirtualAxis;

    struct Fixture {
        columns: ColumnLayout,
        rows: GridRows,
        horizontal: VirtualAxis,
        vertical: VirtualAxis,
    }

    impl Fixture {
        fn new(rows: usize) -> Self {
            let columns = ColumnLayout::new(
                vec![
                    GridColumn::new("id", 4).pinned(),
                    GridColumn::new("a", 10),
                    GridColumn::new("b", 10),
                ],
                PinningPosition::Start,
            )
            .unwrap();
            let mut horizontal = VirtualAxis::new(columns.unpinned_widths(), 1, 0);
            horizontal.set_viewport_size(12);
            horizontal.layout();
            let mut vertical = VirtualAxis::new(vec![1; rows], 0, 0);
            vertical.set_viewport_size(4);
            vertical.layout();
            Self {
                columns,
                rows: GridRows::data(rows),
                horizontal,
                vertical,
            }
        }

        fn ctx(&mut self) -> GridContext<'_> {
            GridContext {
                columns: &self.columns,
                rows: &self.rows,
                horizontal: &mut self.horizontal,
                vertical: &mut self.vertical,
                row_in_edit: None,
                generation: 0,
            }
        }
    }

    #[test]
    fn cancel_pending_returns_to_idle() {
        let mut f = Fixture::new(10);
        let mut nav = NavigationCoordinator::default();
        let at = Coordinate::new(3, 0);
        let out = nav.resolve_vertical(&mut f.ctx(), VerticalDirection::Down, at);
        assert_eq!(
            out,
            NavigationOutcome::ScrollRequested(ScrollRequest {
                axis: Axis::Vertical,
                index: 4,
            })
        );
        assert!(matches!(nav.phase(), NavigationPhase::ScrollRequested { .. }));
        assert!(nav.cancel_pending());
        assert_eq!(nav.phase(), NavigationPhase::Idle);
        assert!(!nav.cancel_pending());
    }

    #[test]
    fn revalidate_drops_focus_past_the_end() {
        let mut f = Fixture::new(10);
        let mut nav = NavigationCoordinator::default();
        let target = Coordinate::new(3, 1);
        assert_eq!(
            nav.focus_coordinate(&mut f.ctx(), target),
            NavigationOutcome::Focus(FocusTarget::Cell(target))
        );

        f.rows = GridRows::data(2);
        nav.revalidate(&f.ctx());
        assert_eq!(nav.active(), None);
    }

    #[test]
    fn revalidate_follows_row_kind_changes() {
        let mut f = Fixture::new(3);
        let mut nav = NavigationCoordinator::default();
        let target = Coordinate::new(1, 1);
        nav.focus_coordinate(&mut f.ctx(), target);

        f.rows = GridRows::new(vec![
            GridRow::data(),
            GridRow::group_header(),
            GridRow::data(),
        ]);
        nav.revalidate(&f.ctx());
        assert_eq!(nav.active(), Some(FocusTarget::Row(1)));

        f.rows = GridRows::data(3);
        nav.revalidate(&f.ctx());
        assert_eq!(nav.active(), Some(FocusTarget::Cell(target)));
    }

    #[test]
    fn horizontal_move_on_synthetic_row_is_ignored() {
        let mut f = Fixture::new(3);
        f.rows = GridRows::new(vec![
            GridRow::data(),
            GridRow::group_header(),
            GridRow::data(),
        ]);
        let mut nav = NavigationCoordinator::default();
        let at = Coordinate::new(1, 0);
        let out = nav.resolve_horizontal(&mut f.ctx(), HorizontalDirection::Right, at);
        assert_eq!(out, NavigationOutcome::None);
    }
}
