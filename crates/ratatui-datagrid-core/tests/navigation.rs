use ratatui_datagrid_core::datagrid::cell::Coordinate;
use ratatui_datagrid_core::datagrid::columns::ColumnLayout;
use ratatui_datagrid_core::datagrid::columns::GridColumn;
use ratatui_datagrid_core::datagrid::columns::PinningPosition;
use ratatui_datagrid_core::datagrid::navigation::Axis;
use ratatui_datagrid_core::datagrid::navigation::FocusTarget;
use ratatui_datagrid_core::datagrid::navigation::GridContext;
use ratatui_datagrid_core::datagrid::navigation::HorizontalDirection;
use ratatui_datagrid_core::datagrid::navigation::NavigationCommand;
use ratatui_datagrid_core::datagrid::navigation::NavigationCoordinator;
use ratatui_datagrid_core::datagrid::navigation::NavigationOptions;
use ratatui_datagrid_core::datagrid::navigation::NavigationOutcome;
use ratatui_datagrid_core::datagrid::navigation::NavigationPhase;
use ratatui_datagrid_core::datagrid::navigation::ScrollRequest;
use ratatui_datagrid_core::datagrid::navigation::VerticalDirection;
use ratatui_datagrid_core::datagrid::rows::GridRow;
use ratatui_datagrid_core::datagrid::rows::GridRows;
use ratatui_datagrid_core::datagrid::rows::RowSource;
use ratatui_datagrid_core::datagrid::virtualization::AxisVirtualizer;

/// Scroll container that records every `scroll_to` and only updates its rendered chunk when
/// `render` is called.
#[derive(Debug, Default)]
struct FakeAxis {
    sizes: Vec<u32>,
    viewport: u32,
    offset: u64,
    rendered: Vec<usize>,
    scrolls: Vec<usize>,
}

impl FakeAxis {
    fn new(sizes: Vec<u32>, viewport: u32) -> Self {
        let mut axis = Self {
            sizes,
            viewport,
            ..Self::default()
        };
        axis.render();
        axis
    }

    fn start(&self, index: usize) -> u64 {
        self.sizes[..index].iter().map(|&s| s as u64).sum()
    }

    fn total(&self) -> u64 {
        self.sizes.iter().map(|&s| s as u64).sum()
    }

    fn max_offset(&self) -> u64 {
        self.total().saturating_sub(self.viewport as u64)
    }

    fn render(&mut self) {
        let lo = self.offset;
        let hi = self.offset + self.viewport as u64;
        self.rendered = (0..self.sizes.len())
            .filter(|&i| {
                let start = self.start(i);
                start < hi && start + self.sizes[i] as u64 > lo
            })
            .collect();
    }
}

impl AxisVirtualizer for FakeAxis {
    fn count(&self) -> usize {
        self.sizes.len()
    }

    fn scroll_offset(&self) -> u64 {
        self.offset
    }

    fn viewport_size(&self) -> u32 {
        self.viewport
    }

    fn start_of(&self, index: usize) -> Option<u64> {
        (index < self.sizes.len()).then(|| self.start(index))
    }

    fn size_at(&self, index: usize) -> Option<u32> {
        self.sizes.get(index).copied()
    }

    fn scroll_for_index(&self, index: usize, align_end: bool) -> Option<u64> {
        let start = self.start_of(index)?;
        let offset = if align_end {
            (start + self.sizes[index] as u64).saturating_sub(self.viewport as u64)
        } else {
            start
        };
        Some(offset.min(self.max_offset()))
    }

    fn scroll_to(&mut self, index: usize) {
        self.scrolls.push(index);
        let Some(start) = self.start_of(index) else {
            return;
        };
        let end = start + self.sizes[index] as u64;
        if start < self.offset {
            self.offset = start;
        } else if end > self.offset + self.viewport as u64 {
            self.offset = end - self.viewport as u64;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    fn is_rendered(&self, index: usize) -> bool {
        self.rendered.contains(&index)
    }
}

struct Grid {
    columns: ColumnLayout,
    rows: GridRows,
    horizontal: FakeAxis,
    vertical: FakeAxis,
    row_in_edit: Option<usize>,
    generation: u64,
    nav: NavigationCoordinator,
}

impl Grid {
    fn new(columns: Vec<GridColumn>, rows: GridRows) -> Self {
        Self::with(columns, PinningPosition::Start, rows, NavigationOptions::default())
    }

    fn with(
        columns: Vec<GridColumn>,
        pinning: PinningPosition,
        rows: GridRows,
        options: NavigationOptions,
    ) -> Self {
        let columns = ColumnLayout::new(columns, pinning).expect("valid columns");
        let horizontal = FakeAxis::new(columns.unpinned_widths(), 25);
        let vertical = FakeAxis::new(rows.heights(), 5);
        Self {
            columns,
            rows,
            horizontal,
            vertical,
            row_in_edit: None,
            generation: 0,
            nav: NavigationCoordinator::new(options),
        }
    }

    fn run(
        &mut self,
        f: impl FnOnce(&mut NavigationCoordinator, &mut GridContext<'_>) -> NavigationOutcome,
    ) -> NavigationOutcome {
        let Grid {
            columns,
            rows,
            horizontal,
            vertical,
            row_in_edit,
            generation,
            nav,
        } = self;
        let mut ctx = GridContext {
            columns,
            rows,
            horizontal,
            vertical,
            row_in_edit: *row_in_edit,
            generation: *generation,
        };
        f(nav, &mut ctx)
    }

    fn render(&mut self) -> NavigationOutcome {
        self.horizontal.render();
        self.vertical.render();
        self.generation += 1;
        self.run(|nav, ctx| nav.on_render_complete(ctx))
    }

    /// Renders until no scroll is pending, like a host redrawing after each scroll.
    fn settle(&mut self, mut outcome: NavigationOutcome) -> NavigationOutcome {
        for _ in 0..4 {
            if !matches!(outcome, NavigationOutcome::ScrollRequested(_)) {
                break;
            }
            outcome = self.render();
        }
        outcome
    }

    fn horizontal(&mut self, direction: HorizontalDirection, at: Coordinate) -> NavigationOutcome {
        self.run(|nav, ctx| nav.resolve_horizontal(ctx, direction, at))
    }

    fn vertical(&mut self, direction: VerticalDirection, at: Coordinate) -> NavigationOutcome {
        self.run(|nav, ctx| nav.resolve_vertical(ctx, direction, at))
    }

    fn tab(&mut self, at: Coordinate) -> NavigationOutcome {
        self.run(|nav, ctx| nav.resolve_tab(ctx, at))
    }

    fn shift_tab(&mut self, at: Coordinate) -> NavigationOutcome {
        self.run(|nav, ctx| nav.resolve_shift_tab(ctx, at))
    }
}

fn columns(pinned: usize, unpinned: usize) -> Vec<GridColumn> {
    (0..pinned)
        .map(|i| GridColumn::new(format!("p{i}"), 10).pinned())
        .chain((0..unpinned).map(|i| GridColumn::new(format!("u{i}"), 10)))
        .collect()
}

fn focus(c: Coordinate) -> NavigationOutcome {
    NavigationOutcome::Focus(FocusTarget::Cell(c))
}

fn scroll(axis: Axis, index: usize) -> NavigationOutcome {
    NavigationOutcome::ScrollRequested(ScrollRequest { axis, index })
}

#[test]
fn boundary_moves_are_noops() {
    let mut g = Grid::new(columns(1, 3), GridRows::data(10));
    assert_eq!(
        g.horizontal(HorizontalDirection::Left, Coordinate::new(0, 0)),
        NavigationOutcome::None
    );
    assert_eq!(
        g.horizontal(HorizontalDirection::Right, Coordinate::new(0, 3)),
        NavigationOutcome::None
    );
    assert_eq!(
        g.vertical(VerticalDirection::Up, Coordinate::new(0, 2)),
        NavigationOutcome::None
    );
    assert_eq!(
        g.vertical(VerticalDirection::Down, Coordinate::new(9, 2)),
        NavigationOutcome::None
    );
    assert!(g.horizontal.scrolls.is_empty());
    assert!(g.vertical.scrolls.is_empty());
    assert_eq!(g.nav.phase(), NavigationPhase::Idle);
}

#[test]
fn pinned_targets_never_scroll() {
    let mut g = Grid::new(columns(3, 3), GridRows::data(5));
    g.horizontal.offset = 20;
    g.horizontal.render();

    for col in 0..2 {
        let at = Coordinate::new(1, col);
        assert_eq!(
            g.horizontal(HorizontalDirection::Right, at),
            focus(at.with_column(col + 1))
        );
    }
    for col in 1..4 {
        let at = Coordinate::new(1, col);
        assert_eq!(
            g.horizontal(HorizontalDirection::Left, at),
            focus(at.with_column(col - 1))
        );
    }
    assert!(g.horizontal.scrolls.is_empty());
}

#[test]
fn left_then_right_returns_to_the_same_cell() {
    let mut g = Grid::new(columns(1, 4), GridRows::data(3));
    for col in 1..5 {
        let start = Coordinate::new(1, col);
        let out = g.horizontal(HorizontalDirection::Left, start);
        let out = g.settle(out);
        assert_eq!(out, focus(start.with_column(col - 1)));

        let out = g.horizontal(HorizontalDirection::Right, start.with_column(col - 1));
        let out = g.settle(out);
        assert_eq!(out, focus(start));
    }
}

#[test]
fn moving_out_of_pinned_region_scrolls_to_first_unpinned_column() {
    let mut g = Grid::new(
        vec![
            GridColumn::new("id", 4).pinned(),
            GridColumn::new("name", 8).pinned(),
            GridColumn::new("city", 12),
            GridColumn::new("country", 12),
        ],
        GridRows::data(3),
    );
    g.horizontal.viewport = 15;
    g.horizontal.offset = 12;
    g.horizontal.render();

    let out = g.horizontal(HorizontalDirection::Right, Coordinate::new(0, 1));
    assert_eq!(out, scroll(Axis::Horizontal, 0));
    assert_eq!(g.horizontal.scrolls, vec![0]);
    assert_eq!(g.nav.active(), None);

    assert_eq!(g.render(), focus(Coordinate::new(0, 2)));
    assert_eq!(g.nav.active(), Some(FocusTarget::Cell(Coordinate::new(0, 2))));
}

#[test]
fn cell_moves_bring_a_scrolled_away_row_back_first() {
    let mut g = Grid::new(columns(1, 3), GridRows::data(100));
    g.vertical.offset = 50;
    g.vertical.render();

    let out = g.horizontal(HorizontalDirection::Right, Coordinate::new(0, 0));
    assert_eq!(out, scroll(Axis::Vertical, 0));
    assert_eq!(g.nav.active(), None);
    assert_eq!(g.render(), focus(Coordinate::new(0, 1)));
    assert_eq!(g.vertical.offset, 0);

    g.vertical.offset = 50;
    g.vertical.render();
    assert_eq!(g.tab(Coordinate::new(0, 1)), scroll(Axis::Vertical, 0));
    assert_eq!(g.render(), focus(Coordinate::new(0, 2)));
    assert!(g.horizontal.scrolls.is_empty());
}

#[test]
fn row_straddling_the_bottom_edge_is_scrolled_into_view() {
    let rows = GridRows::new(vec![
        GridRow::data(),
        GridRow::data(),
        GridRow::data(),
        GridRow::detail(3),
        GridRow::data(),
    ]);
    let mut g = Grid::new(columns(1, 2), rows);
    assert!(g.vertical.is_start_visible(3));

    let out = g.vertical(VerticalDirection::Down, Coordinate::new(2, 0));
    assert_eq!(out, scroll(Axis::Vertical, 3));
    assert_eq!(g.vertical.offset, 1);
    assert_eq!(g.render(), NavigationOutcome::Focus(FocusTarget::Row(3)));
}

#[test]
fn row_taller_than_the_viewport_resolves_after_one_render() {
    let rows = GridRows::new(vec![GridRow::data(), GridRow::detail(8), GridRow::data()]);
    let mut g = Grid::new(columns(1, 2), rows);

    let out = g.vertical(VerticalDirection::Down, Coordinate::new(0, 0));
    assert_eq!(out, scroll(Axis::Vertical, 1));
    assert_eq!(g.render(), NavigationOutcome::Focus(FocusTarget::Row(1)));
    assert_eq!(g.render(), NavigationOutcome::None);

    // The row covers the whole viewport, so coming back to it needs no scroll.
    assert_eq!(
        g.vertical(VerticalDirection::Up, Coordinate::new(2, 0)),
        NavigationOutcome::Focus(FocusTarget::Row(1))
    );
    assert_eq!(g.vertical.scrolls, vec![1]);
}

#[test]
fn go_to_first_cell_scrolls_once_and_focuses_once() {
    let mut g = Grid::new(columns(0, 3), GridRows::data(100));
    g.vertical.offset = 50;
    g.vertical.render();

    let out = g.run(|nav, ctx| nav.go_to_first_cell(ctx));
    assert_eq!(out, scroll(Axis::Vertical, 0));
    assert_eq!(g.vertical.scrolls, vec![0]);

    assert_eq!(g.render(), focus(Coordinate::new(0, 0)));
    assert_eq!(g.render(), NavigationOutcome::None);
    assert!(g.horizontal.scrolls.is_empty());
}

#[test]
fn go_to_first_cell_in_view_focuses_without_scrolling() {
    let mut g = Grid::new(columns(0, 3), GridRows::data(100));
    let out = g.run(|nav, ctx| nav.go_to_first_cell(ctx));
    assert_eq!(out, focus(Coordinate::new(0, 0)));
    assert!(g.vertical.scrolls.is_empty());
}

#[test]
fn render_current_at_request_time_is_ignored() {
    let mut g = Grid::new(columns(0, 3), GridRows::data(20));
    let out = g.vertical(VerticalDirection::Down, Coordinate::new(4, 0));
    assert_eq!(out, scroll(Axis::Vertical, 5));

    g.vertical.render();
    let stale = g.run(|nav, ctx| nav.on_render_complete(ctx));
    assert_eq!(stale, NavigationOutcome::None);
    assert!(matches!(
        g.nav.phase(),
        NavigationPhase::ScrollRequested {
            requested_at: 0,
            ..
        }
    ));

    assert_eq!(g.render(), focus(Coordinate::new(5, 0)));
    assert_eq!(g.nav.phase(), NavigationPhase::Idle);
}

#[test]
fn new_request_supersedes_pending_focus() {
    let mut g = Grid::new(columns(0, 3), GridRows::data(20));
    let out = g.vertical(VerticalDirection::Down, Coordinate::new(4, 0));
    assert_eq!(out, scroll(Axis::Vertical, 5));

    let out = g.horizontal(HorizontalDirection::Right, Coordinate::new(4, 0));
    assert_eq!(out, focus(Coordinate::new(4, 1)));
    assert_eq!(g.nav.phase(), NavigationPhase::Idle);

    assert_eq!(g.render(), NavigationOutcome::None);
    assert_eq!(g.nav.active_cell(), Some(Coordinate::new(4, 1)));
}

#[test]
fn unrendered_target_is_dropped() {
    let mut g = Grid::new(columns(0, 2), GridRows::data(50));
    let out = g.run(|nav, ctx| nav.navigate_bottom(ctx, 0));
    assert_eq!(out, scroll(Axis::Vertical, 49));

    // Someone else scrolled back before the render landed.
    g.vertical.offset = 0;
    assert_eq!(g.render(), NavigationOutcome::None);
    assert_eq!(g.nav.phase(), NavigationPhase::Idle);
    assert_eq!(g.nav.active(), None);
}

#[test]
fn empty_body_is_a_noop() {
    let mut g = Grid::new(columns(1, 2), GridRows::default());
    assert_eq!(g.run(|nav, ctx| nav.navigate_top(ctx, 0)), NavigationOutcome::None);
    assert_eq!(g.run(|nav, ctx| nav.navigate_bottom(ctx, 0)), NavigationOutcome::None);
    assert_eq!(g.run(|nav, ctx| nav.go_to_first_cell(ctx)), NavigationOutcome::None);
    assert_eq!(g.run(|nav, ctx| nav.go_to_last_cell(ctx)), NavigationOutcome::None);
    assert_eq!(
        g.run(|nav, ctx| nav.execute(ctx, NavigationCommand::Down)),
        NavigationOutcome::None
    );
}

#[test]
fn top_and_bottom_skip_synthetic_rows() {
    let rows = GridRows::new(vec![
        GridRow::group_header(),
        GridRow::data(),
        GridRow::data(),
        GridRow::detail(1),
        GridRow::group_summary(),
    ]);
    let mut g = Grid::new(columns(1, 2), rows);
    assert_eq!(g.run(|nav, ctx| nav.navigate_top(ctx, 1)), focus(Coordinate::new(1, 1)));
    assert_eq!(g.run(|nav, ctx| nav.navigate_bottom(ctx, 1)), focus(Coordinate::new(2, 1)));
    assert_eq!(g.run(|nav, ctx| nav.go_to_last_cell(ctx)), focus(Coordinate::new(2, 2)));
}

#[test]
fn execute_without_focus_lands_on_first_cell() {
    let mut g = Grid::new(columns(1, 2), GridRows::data(3));
    assert_eq!(
        g.run(|nav, ctx| nav.execute(ctx, NavigationCommand::Right)),
        focus(Coordinate::new(0, 0))
    );
    assert_eq!(
        g.run(|nav, ctx| nav.execute(ctx, NavigationCommand::Right)),
        focus(Coordinate::new(0, 1))
    );
}

#[test]
fn tab_wraps_rows_and_focuses_detail_rows_whole() {
    let rows = GridRows::new(vec![GridRow::data(), GridRow::detail(2), GridRow::data()]);
    let mut g = Grid::new(columns(1, 2), rows);

    assert_eq!(
        g.tab(Coordinate::new(0, 2)),
        NavigationOutcome::Focus(FocusTarget::Row(1))
    );
    assert_eq!(g.tab(Coordinate::new(1, 0)), focus(Coordinate::new(2, 0)));
    assert_eq!(
        g.shift_tab(Coordinate::new(2, 0)),
        NavigationOutcome::Focus(FocusTarget::Row(1))
    );
    assert_eq!(g.shift_tab(Coordinate::new(1, 0)), focus(Coordinate::new(0, 2)));
    assert_eq!(g.shift_tab(Coordinate::new(0, 0)), NavigationOutcome::None);
    assert_eq!(g.tab(Coordinate::new(2, 2)), NavigationOutcome::None);
}

#[test]
fn root_summary_row_is_reached_with_tab() {
    let options = NavigationOptions {
        root_summaries: true,
        ..Default::default()
    };
    let mut g = Grid::with(columns(1, 2), PinningPosition::Start, GridRows::data(3), options);

    assert_eq!(g.tab(Coordinate::new(2, 2)), focus(Coordinate::summary(3, 0)));
    assert_eq!(g.tab(Coordinate::summary(3, 0)), focus(Coordinate::summary(3, 1)));
    assert_eq!(g.tab(Coordinate::summary(3, 2)), NavigationOutcome::None);
    assert_eq!(
        g.shift_tab(Coordinate::summary(3, 0)),
        focus(Coordinate::new(2, 2))
    );
    assert_eq!(
        g.vertical(VerticalDirection::Down, Coordinate::summary(3, 1)),
        NavigationOutcome::None
    );
}

#[test]
fn shift_tab_from_root_summary_scrolls_to_last_body_row() {
    let options = NavigationOptions {
        root_summaries: true,
        ..Default::default()
    };
    let mut g = Grid::with(columns(1, 2), PinningPosition::Start, GridRows::data(20), options);

    let out = g.shift_tab(Coordinate::summary(20, 0));
    assert_eq!(out, scroll(Axis::Vertical, 19));
    assert_eq!(g.render(), focus(Coordinate::new(19, 2)));
}

#[test]
fn edit_mode_tab_visits_only_editable_cells() {
    let mut g = Grid::new(
        vec![
            GridColumn::new("a", 5).editable(),
            GridColumn::new("b", 5),
            GridColumn::new("c", 5).editable(),
        ],
        GridRows::data(2),
    );

    g.row_in_edit = Some(0);
    assert_eq!(g.tab(Coordinate::new(0, 0)), focus(Coordinate::new(0, 2)));
    assert_eq!(g.tab(Coordinate::new(0, 2)), focus(Coordinate::new(1, 0)));
    assert_eq!(
        g.shift_tab(Coordinate::new(0, 0)),
        NavigationOutcome::SubmitRowEdit {
            row: 0,
            forward: false
        }
    );

    g.row_in_edit = Some(1);
    assert_eq!(g.shift_tab(Coordinate::new(1, 0)), focus(Coordinate::new(0, 2)));
    assert_eq!(
        g.tab(Coordinate::new(1, 2)),
        NavigationOutcome::SubmitRowEdit {
            row: 1,
            forward: true
        }
    );
}

#[test]
fn shift_tab_from_first_cell_enters_filter_row() {
    let options = NavigationOptions {
        quick_filter: true,
        ..Default::default()
    };
    let cols = columns(1, 4)
        .into_iter()
        .map(GridColumn::filterable)
        .collect();
    let mut g = Grid::with(cols, PinningPosition::Start, GridRows::data(3), options);

    let out = g.shift_tab(Coordinate::new(0, 0));
    assert_eq!(out, scroll(Axis::Horizontal, 3));
    assert_eq!(
        g.render(),
        NavigationOutcome::Focus(FocusTarget::FilterCell(4))
    );

    assert_eq!(
        g.run(|nav, ctx| nav.resolve_filter_tab(ctx, 4, false)),
        NavigationOutcome::Focus(FocusTarget::FilterCell(3))
    );
    assert_eq!(
        g.run(|nav, ctx| nav.resolve_filter_tab(ctx, 0, false)),
        NavigationOutcome::None
    );
    assert_eq!(
        g.run(|nav, ctx| nav.resolve_filter_tab(ctx, 4, true)),
        focus(Coordinate::new(0, 0))
    );
}

#[test]
fn vertical_scroll_chains_into_horizontal_scroll() {
    let mut g = Grid::new(columns(1, 4), GridRows::data(50));

    let out = g.run(|nav, ctx| nav.go_to_last_cell(ctx));
    assert_eq!(out, scroll(Axis::Vertical, 49));
    assert_eq!(g.render(), scroll(Axis::Horizontal, 3));
    assert_eq!(g.render(), focus(Coordinate::new(49, 4)));
    assert_eq!(g.vertical.scrolls, vec![49]);
    assert_eq!(g.horizontal.scrolls, vec![3]);
}

#[test]
fn end_pinned_columns_stay_reachable_without_scrolling() {
    let mut g = Grid::with(
        vec![
            GridColumn::new("a", 10),
            GridColumn::new("b", 10),
            GridColumn::new("c", 10),
            GridColumn::new("actions", 6).pinned(),
        ],
        PinningPosition::End,
        GridRows::data(3),
        NavigationOptions::default(),
    );
    g.horizontal.viewport = 15;
    g.horizontal.render();

    assert_eq!(
        g.run(|nav, ctx| nav.resolve_row_end(ctx, Coordinate::new(0, 0))),
        focus(Coordinate::new(0, 3))
    );
    assert!(g.horizontal.scrolls.is_empty());

    assert_eq!(
        g.horizontal(HorizontalDirection::Left, Coordinate::new(0, 3)),
        scroll(Axis::Horizontal, 2)
    );
}
