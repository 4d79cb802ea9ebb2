use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use tracing::debug;
use virtualizer::VirtualItem;

use crate::datagrid::cell::Coordinate;
use crate::datagrid::columns::ColumnLayout;
use crate::datagrid::columns::GridColumn;
use crate::datagrid::columns::LayoutError;
use crate::datagrid::columns::PinningPosition;
use crate::datagrid::navigation::FocusTarget;
use crate::datagrid::navigation::GridContext;
use crate::datagrid::navigation::NavigationCommand;
use crate::datagrid::navigation::NavigationCoordinator;
use crate::datagrid::navigation::NavigationOptions;
use crate::datagrid::navigation::NavigationOutcome;
use crate::datagrid::rows::GridRows;
use crate::datagrid::rows::RowKind;
use crate::datagrid::rows::RowSource;
use crate::datagrid::virtualization::AxisVirtualizer;
use crate::datagrid::virtualization::VirtualAxis;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::keymap::NavigationBindings;
use crate::render;
use crate::theme::GridTheme;
use crate::viewport::ViewportSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataGridAction {
    None,
    Redraw,
    Activated(Coordinate),
    /// Tab carried row editing from one data row to another.
    EditMoved { from: usize, to: usize },
    EditSubmitted(usize),
    EditCancelled(usize),
}

/// Which band of the grid a rendered cell belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellRole {
    Header,
    Filter,
    Body(RowKind),
    RootSummary,
}

/// Options for [`DataGridView`].
#[derive(Clone, Debug)]
pub struct DataGridViewOptions {
    pub show_header: bool,
    /// Renders a filter row under the header, reachable with Shift+Tab from the first cell.
    pub show_filter_row: bool,
    /// Renders a summary row under the body, reachable with Tab from the last cell.
    pub show_root_summary: bool,
    pub show_scrollbar_y: bool,
    pub overscan_rows: usize,
    pub overscan_cols: usize,
    pub col_gap: u16,
    /// Rows (or columns, for horizontal wheels) scrolled per wheel notch.
    pub wheel_step: u16,
    pub style: Style,
    pub header_style: Style,
    pub cursor_style: Style,
    pub scrollbar_style: Style,
    pub bindings: NavigationBindings,
}

impl Default for DataGridViewOptions {
    fn default() -> Self {
        Self {
            show_header: true,
            show_filter_row: false,
            show_root_summary: false,
            show_scrollbar_y: true,
            overscan_rows: 2,
            overscan_cols: 2,
            col_gap: 1,
            wheel_step: 3,
            style: Style::default(),
            header_style: Style::default().add_modifier(Modifier::BOLD),
            cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            scrollbar_style: Style::default(),
            bindings: NavigationBindings::default(),
        }
    }
}

/// Context passed to the `render_cell` callback in [`DataGridView::render`].
#[derive(Clone, Copy, Debug)]
pub struct DataGridCellContext {
    pub role: CellRole,
    /// Body row index, or `rows.len()` for the root summary. `None` for header and filter.
    pub row: Option<usize>,
    /// Visible column index. `None` for synthetic rows, which get a single full-width cell.
    pub column: Option<usize>,
    pub width: u16,
    pub clip_left: u32,
    pub clip_top: u32,
    pub is_focused: bool,
    pub is_editing: bool,
}

/// A virtualized grid with pinned columns, synthetic rows and keyboard navigation.
///
/// Unpinned columns and body rows are virtualized independently. Navigation never focuses a
/// cell outside the rendered chunk: when a move needs a scroll, the focus lands during the
/// next [`render`](Self::render).
///
/// The grid is UI-agnostic: drive it from your app loop by calling `handle_event` and
/// `render`.
pub struct DataGridView {
    options: DataGridViewOptions,
    columns: ColumnLayout,
    rows: GridRows,
    horizontal: VirtualAxis,
    vertical: VirtualAxis,
    navigation: NavigationCoordinator,
    row_in_edit: Option<usize>,
    generation: u64,
    deferred: Vec<DataGridAction>,
}

impl Default for DataGridView {
    fn default() -> Self {
        let options = DataGridViewOptions::default();
        let horizontal =
            VirtualAxis::new(Vec::new(), options.col_gap as u32, options.overscan_cols);
        let vertical = VirtualAxis::new(Vec::new(), 0, options.overscan_rows);
        let navigation = NavigationCoordinator::new(navigation_options(&options));
        Self {
            options,
            columns: ColumnLayout::default(),
            rows: GridRows::default(),
            horizontal,
            vertical,
            navigation,
            row_in_edit: None,
            generation: 0,
            deferred: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ColumnSlot {
    column: usize,
    x: u16,
    width: u16,
    clip_left: u32,
    /// Right edge of the region the slot lives in.
    limit: u16,
}

#[derive(Clone, Copy, Debug)]
struct FrameLayout {
    content: Rect,
    header: Rect,
    filter: Rect,
    body: Rect,
    summary: Rect,
    pinned: Rect,
    unpinned: Rect,
    separator_x: Option<u16>,
    scrollbar: Option<Rect>,
}

#[derive(Clone, Copy)]
struct BandStyles {
    base: Style,
    cursor: Style,
}

impl DataGridView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DataGridViewOptions) -> Self {
        let mut v = Self::default();
        v.set_options(options);
        v
    }

    pub fn options(&self) -> &DataGridViewOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: DataGridViewOptions) {
        self.horizontal.set_gap(options.col_gap as u32);
        self.horizontal.set_overscan(options.overscan_cols);
        self.vertical.set_overscan(options.overscan_rows);
        self.navigation.set_options(navigation_options(&options));
        self.options = options;
        self.revalidate();
    }

    pub fn set_columns(&mut self, columns: Vec<GridColumn>) -> Result<(), LayoutError> {
        let layout = ColumnLayout::new(columns, self.columns.pinning())?;
        self.set_layout(layout);
        Ok(())
    }

    pub fn set_layout(&mut self, layout: ColumnLayout) {
        self.columns = layout;
        self.horizontal.set_sizes(self.columns.unpinned_widths());
        self.revalidate();
    }

    pub fn set_pinning(&mut self, pinning: PinningPosition) {
        self.columns.set_pinning(pinning);
        self.horizontal.set_sizes(self.columns.unpinned_widths());
        self.revalidate();
    }

    pub fn set_pinned(&mut self, key: &str, pinned: bool) -> Result<(), LayoutError> {
        self.columns.set_pinned(key, pinned)?;
        self.horizontal.set_sizes(self.columns.unpinned_widths());
        self.revalidate();
        Ok(())
    }

    pub fn set_rows(&mut self, rows: impl Into<GridRows>) {
        self.rows = rows.into();
        self.vertical.set_sizes(self.rows.heights());
        if self.row_in_edit.is_some_and(|r| r >= self.rows.len()) {
            self.row_in_edit = None;
        }
        self.revalidate();
    }

    pub fn set_row_count(&mut self, rows: usize) {
        self.set_rows(GridRows::data(rows));
    }

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn rows(&self) -> &GridRows {
        &self.rows
    }

    pub fn focus(&self) -> Option<FocusTarget> {
        self.navigation.active()
    }

    pub fn cursor(&self) -> Option<Coordinate> {
        self.navigation.active_cell()
    }

    pub fn navigation(&self) -> &NavigationCoordinator {
        &self.navigation
    }

    /// True while a scroll is waiting for the next render to apply its focus.
    pub fn is_settling(&self) -> bool {
        self.navigation.is_pending()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn row_in_edit(&self) -> Option<usize> {
        self.row_in_edit
    }

    pub fn viewport(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            scroll_left: self.horizontal.scroll_offset(),
            scroll_top: self.vertical.scroll_offset(),
            container_width: self.horizontal.viewport_size().min(u16::MAX as u32) as u16,
            container_height: self.vertical.viewport_size().min(u16::MAX as u32) as u16,
            content_width: self.horizontal.total_size(),
            content_height: self.vertical.total_size(),
        }
    }

    /// Actions produced while applying a deferred focus during `render`.
    pub fn take_deferred_actions(&mut self) -> Vec<DataGridAction> {
        std::mem::take(&mut self.deferred)
    }

    pub fn set_cursor(&mut self, coordinate: Coordinate) -> DataGridAction {
        let outcome = self.with_context(|nav, ctx| nav.focus_coordinate(ctx, coordinate));
        self.apply_outcome(outcome)
    }

    /// Puts the focused data row into edit mode.
    pub fn begin_row_edit(&mut self) -> bool {
        let Some(cursor) = self.cursor() else {
            return false;
        };
        if self.rows.kind(cursor.row) != Some(RowKind::Data) {
            return false;
        }
        debug!(target: "navigation", row = cursor.row, "row edit started");
        self.row_in_edit = Some(cursor.row);
        true
    }

    pub fn navigate(&mut self, command: NavigationCommand) -> DataGridAction {
        let outcome = self.with_context(|nav, ctx| nav.execute(ctx, command));
        self.apply_outcome(outcome)
    }

    pub fn handle_event(&mut self, event: InputEvent) -> DataGridAction {
        match event {
            InputEvent::Paste(_) => DataGridAction::None,
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Wheel(wheel) => {
                let (rows, cols) = wheel.delta(i64::from(self.options.wheel_step));
                self.scroll_y_by(rows);
                self.scroll_x_by(cols);
                DataGridAction::Redraw
            }
        }
    }

    pub fn scroll_y_by(&mut self, delta: i64) {
        self.vertical.scroll_by(delta);
    }

    pub fn scroll_x_by(&mut self, delta: i64) {
        self.horizontal.scroll_by(delta);
    }

    pub fn render<F>(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        theme: &GridTheme,
        mut render_cell: F,
    ) where
        F: FnMut(Rect, DataGridCellContext, &mut Buffer, &GridTheme),
    {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let frame = self.frame_layout(area);
        self.horizontal.set_viewport_size(frame.unpinned.width as u32);
        self.vertical.set_viewport_size(frame.body.height as u32);

        let scroll_x = self.horizontal.scroll_offset();
        let scroll_y = self.vertical.scroll_offset();
        let col_items: Vec<VirtualItem> = self.horizontal.layout().to_vec();
        let row_items: Vec<VirtualItem> = self.vertical.layout().to_vec();

        self.generation += 1;
        let outcome = self.with_context(|nav, ctx| nav.on_render_complete(ctx));
        match self.apply_outcome(outcome) {
            DataGridAction::None | DataGridAction::Redraw => {}
            action => self.deferred.push(action),
        }

        let base = if self.options.style == Style::default() {
            theme.text_primary
        } else {
            self.options.style
        };
        let styles = BandStyles {
            base,
            cursor: self.options.cursor_style.patch(theme.accent),
        };
        buf.set_style(frame.content, base);

        let slots = self.column_slots(&frame, scroll_x, &col_items);

        if frame.header.height > 0 {
            let style = base.patch(theme.header).patch(self.options.header_style);
            self.render_band(
                buf,
                theme,
                frame.header,
                &slots,
                CellRole::Header,
                None,
                BandStyles { base: style, ..styles },
                &mut render_cell,
            );
        }
        if frame.filter.height > 0 {
            self.render_band(
                buf,
                theme,
                frame.filter,
                &slots,
                CellRole::Filter,
                None,
                BandStyles {
                    base: base.patch(theme.filter),
                    ..styles
                },
                &mut render_cell,
            );
        }

        for item in &row_items {
            let (row_rect, clip_top) =
                render::clipped_rect_y(frame.body, scroll_y, item.start, item.size);
            if row_rect.height == 0 {
                continue;
            }
            let Some(kind) = self.rows.kind(item.index) else {
                continue;
            };
            if kind.is_synthetic() {
                let rect = Rect::new(
                    frame.content.x,
                    row_rect.y,
                    frame.content.width,
                    row_rect.height,
                );
                let is_focused = self.focus() == Some(FocusTarget::Row(item.index));
                let style = if is_focused {
                    styles.cursor
                } else if kind == RowKind::GroupHeader {
                    base.patch(theme.group_header)
                } else {
                    base.patch(theme.detail)
                };
                buf.set_style(rect, style);
                let ctx = DataGridCellContext {
                    role: CellRole::Body(kind),
                    row: Some(item.index),
                    column: None,
                    width: rect.width,
                    clip_left: 0,
                    clip_top,
                    is_focused,
                    is_editing: false,
                };
                render_cell(rect, ctx, buf, theme);
                continue;
            }

            let mut row_base = base;
            if kind.is_summary() {
                row_base = row_base.patch(theme.summary);
            }
            if self.row_in_edit == Some(item.index) {
                row_base = row_base.patch(theme.editing);
            }
            self.render_band(
                buf,
                theme,
                row_rect,
                &slots,
                CellRole::Body(kind),
                Some((item.index, clip_top)),
                BandStyles {
                    base: row_base,
                    ..styles
                },
                &mut render_cell,
            );
        }

        if frame.summary.height > 0 {
            self.render_band(
                buf,
                theme,
                frame.summary,
                &slots,
                CellRole::RootSummary,
                Some((self.rows.len(), 0)),
                BandStyles {
                    base: base.patch(theme.summary),
                    ..styles
                },
                &mut render_cell,
            );
        }

        if let Some(x) = frame.separator_x {
            render::draw_vertical_rule(
                buf,
                x,
                frame.content.y,
                frame.content.height,
                theme.pin_separator,
            );
        }

        if let Some(sb) = frame.scrollbar {
            render::render_scrollbar(
                Rect::new(sb.x, frame.body.y, 1, frame.body.height),
                buf,
                &self.viewport(),
                self.options.scrollbar_style,
            );
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> DataGridAction {
        if let Some(row) = self.row_in_edit {
            return self.handle_edit_key(key, row);
        }
        if let Some(command) = self.options.bindings.command_for(&key) {
            return self.navigate(command);
        }
        match key.code {
            KeyCode::PageDown => self.page(true),
            KeyCode::PageUp => self.page(false),
            KeyCode::Enter => match self.focus() {
                Some(FocusTarget::Cell(c)) => DataGridAction::Activated(c),
                _ => DataGridAction::None,
            },
            _ => DataGridAction::None,
        }
    }

    /// While a row is edited only Tab / Shift+Tab navigate; other keys belong to the editor.
    fn handle_edit_key(&mut self, key: KeyEvent, row: usize) -> DataGridAction {
        match self.options.bindings.command_for(&key) {
            Some(command @ (NavigationCommand::Tab | NavigationCommand::ShiftTab)) => {
                return self.navigate(command);
            }
            _ => {}
        }
        match key.code {
            KeyCode::Enter => {
                self.row_in_edit = None;
                debug!(target: "navigation", row, "row edit submitted");
                DataGridAction::EditSubmitted(row)
            }
            KeyCode::Esc => {
                self.row_in_edit = None;
                debug!(target: "navigation", row, "row edit cancelled");
                DataGridAction::EditCancelled(row)
            }
            _ => DataGridAction::None,
        }
    }

    fn page(&mut self, down: bool) -> DataGridAction {
        let step = self.vertical.viewport_size().saturating_sub(1).max(1) as i64;
        self.vertical.scroll_by(if down { step } else { -step });
        let Some(row) = self.vertical.index_at_offset(self.vertical.scroll_offset()) else {
            return DataGridAction::None;
        };
        let column = self.cursor().map(|c| c.column).unwrap_or(0);
        self.set_cursor(Coordinate::new(row, column));
        DataGridAction::Redraw
    }

    fn apply_outcome(&mut self, outcome: NavigationOutcome) -> DataGridAction {
        match outcome {
            NavigationOutcome::None => DataGridAction::None,
            NavigationOutcome::ScrollRequested(_) => DataGridAction::Redraw,
            NavigationOutcome::Focus(target) => self.follow_edit(target),
            NavigationOutcome::SubmitRowEdit { row, .. } => {
                self.row_in_edit = None;
                DataGridAction::EditSubmitted(row)
            }
        }
    }

    fn follow_edit(&mut self, target: FocusTarget) -> DataGridAction {
        let (Some(from), FocusTarget::Cell(c)) = (self.row_in_edit, target) else {
            return DataGridAction::Redraw;
        };
        if c.row == from || self.rows.kind(c.row) != Some(RowKind::Data) {
            return DataGridAction::Redraw;
        }
        debug!(target: "navigation", from, to = c.row, "row edit moved");
        self.row_in_edit = Some(c.row);
        DataGridAction::EditMoved { from, to: c.row }
    }

    fn revalidate(&mut self) {
        self.with_context(|nav, ctx| nav.revalidate(ctx));
    }

    fn with_context<R>(
        &mut self,
        f: impl FnOnce(&mut NavigationCoordinator, &mut GridContext<'_>) -> R,
    ) -> R {
        let mut ctx = GridContext {
            columns: &self.columns,
            rows: &self.rows,
            horizontal: &mut self.horizontal,
            vertical: &mut self.vertical,
            row_in_edit: self.row_in_edit,
            generation: self.generation,
        };
        f(&mut self.navigation, &mut ctx)
    }

    fn frame_layout(&self, area: Rect) -> FrameLayout {
        let (content, scrollbar) = if self.options.show_scrollbar_y && area.width >= 2 {
            (
                Rect::new(area.x, area.y, area.width - 1, area.height),
                Some(Rect::new(area.x + area.width - 1, area.y, 1, area.height)),
            )
        } else {
            (area, None)
        };

        let mut remaining = content.height;
        let mut take = |enabled: bool| {
            let h = if enabled { remaining.min(1) } else { 0 };
            remaining -= h;
            h
        };
        let header_h = take(self.options.show_header);
        let filter_h = take(self.options.show_filter_row);
        let summary_h = take(self.options.show_root_summary);
        let body_h = remaining;

        let header = Rect::new(content.x, content.y, content.width, header_h);
        let filter = Rect::new(content.x, header.bottom(), content.width, filter_h);
        let body = Rect::new(content.x, filter.bottom(), content.width, body_h);
        let summary = Rect::new(content.x, body.bottom(), content.width, summary_h);

        let pinned_w = if self.columns.pinned_count() > 0 {
            self.columns
                .pinned_width(self.options.col_gap)
                .min(content.width)
        } else {
            0
        };
        let unpinned_w = content.width - pinned_w;
        let (pinned, unpinned, separator_x) = match self.columns.pinning() {
            PinningPosition::Start => {
                let pinned = Rect::new(content.x, content.y, pinned_w, content.height);
                let unpinned = Rect::new(pinned.right(), content.y, unpinned_w, content.height);
                let sep = (pinned_w > 0 && self.options.col_gap > 0).then(|| pinned.right() - 1);
                (pinned, unpinned, sep)
            }
            PinningPosition::End => {
                let unpinned = Rect::new(content.x, content.y, unpinned_w, content.height);
                let pinned = Rect::new(unpinned.right(), content.y, pinned_w, content.height);
                let sep = (pinned_w > 0 && self.options.col_gap > 0).then_some(pinned.x);
                (pinned, unpinned, sep)
            }
        };

        FrameLayout {
            content,
            header,
            filter,
            body,
            summary,
            pinned,
            unpinned,
            separator_x,
            scrollbar,
        }
    }

    fn column_slots(
        &self,
        frame: &FrameLayout,
        scroll_x: u64,
        items: &[VirtualItem],
    ) -> Vec<ColumnSlot> {
        let gap = self.options.col_gap;
        let lead = match self.columns.pinning() {
            PinningPosition::Start => 0,
            PinningPosition::End => gap,
        };
        let mut slots = Vec::with_capacity(self.columns.pinned_count() + items.len());

        let mut offset = 0u16;
        for c in self.columns.pinned() {
            let Some(column) = c.visible_index else {
                continue;
            };
            let x = offset.saturating_add(lead);
            offset = offset.saturating_add(c.width).saturating_add(gap);
            if x >= frame.pinned.width {
                continue;
            }
            slots.push(ColumnSlot {
                column,
                x: frame.pinned.x + x,
                width: c.width.min(frame.pinned.width - x),
                clip_left: 0,
                limit: frame.pinned.right(),
            });
        }

        for item in items {
            let Some(column) = self.columns.visible_index_of_unpinned(item.index) else {
                continue;
            };
            let (rect, clip_left) =
                render::clipped_rect_x(frame.unpinned, scroll_x, item.start, item.size);
            if rect.width == 0 {
                continue;
            }
            slots.push(ColumnSlot {
                column,
                x: rect.x,
                width: rect.width,
                clip_left,
                limit: frame.unpinned.right(),
            });
        }
        slots
    }

    #[allow(clippy::too_many_arguments)]
    fn render_band<F>(
        &self,
        buf: &mut Buffer,
        theme: &GridTheme,
        band: Rect,
        slots: &[ColumnSlot],
        role: CellRole,
        row: Option<(usize, u32)>,
        styles: BandStyles,
        render_cell: &mut F,
    ) where
        F: FnMut(Rect, DataGridCellContext, &mut Buffer, &GridTheme),
    {
        buf.set_style(band, styles.base);
        let last = self.columns.last_visible_index().unwrap_or(0);
        for slot in slots {
            let rect = Rect::new(slot.x, band.y, slot.width, band.height);
            let is_focused = match (role, self.focus()) {
                (CellRole::Filter, Some(FocusTarget::FilterCell(col))) => col == slot.column,
                (CellRole::Body(_) | CellRole::RootSummary, Some(FocusTarget::Cell(c))) => {
                    Some(c.row) == row.map(|(r, _)| r) && c.column == slot.column
                }
                _ => false,
            };
            let is_editing = row.is_some_and(|(r, _)| self.row_in_edit == Some(r))
                && self
                    .columns
                    .column(slot.column)
                    .is_some_and(|c| c.editable);
            let style = if is_focused { styles.cursor } else { styles.base };
            buf.set_style(rect, style);

            let ctx = DataGridCellContext {
                role,
                row: row.map(|(r, _)| r),
                column: Some(slot.column),
                width: slot.width,
                clip_left: slot.clip_left,
                clip_top: row.map(|(_, clip)| clip).unwrap_or(0),
                is_focused,
                is_editing,
            };
            render_cell(rect, ctx, buf, theme);

            let gap_x = slot.x + slot.width;
            if self.options.col_gap > 0 && slot.column != last && gap_x < slot.limit {
                render::draw_vertical_rule(buf, gap_x, band.y, band.height, theme.text_muted);
            }
        }
    }
}

fn navigation_options(options: &DataGridViewOptions) -> NavigationOptions {
    NavigationOptions {
        root_summaries: options.show_root_summary,
        quick_filter: options.show_filter_row,
    }
}
