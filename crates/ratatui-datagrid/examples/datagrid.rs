use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui_datagrid::crossterm_input::input_event_from_crossterm;
use ratatui_datagrid::datagrid::columns::GridColumn;
use ratatui_datagrid::datagrid::navigation::FocusTarget;
use ratatui_datagrid::datagrid::rows::GridRow;
use ratatui_datagrid::datagrid::rows::RowKind;
use ratatui_datagrid::datagrid::view::CellRole;
use ratatui_datagrid::datagrid::view::DataGridAction;
use ratatui_datagrid::datagrid::view::DataGridCellContext;
use ratatui_datagrid::datagrid::view::DataGridView;
use ratatui_datagrid::datagrid::view::DataGridViewOptions;
use ratatui_datagrid::render;
use ratatui_datagrid::theme::GridTheme;
use std::io;
use std::time::Duration;

const METRICS: usize = 40;
const GROUPS: usize = 2_000;
const ROWS_PER_GROUP: usize = 12;

fn main() -> io::Result<()> {
    init_tracing()?;

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = GridTheme::default();
    let mut grid = DataGridView::with_options(DataGridViewOptions {
        show_filter_row: true,
        show_root_summary: true,
        ..Default::default()
    });
    grid.set_columns(columns())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    grid.set_rows(rows());

    let res = run(&mut terminal, &theme, &mut grid);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}

/// Logs go to `datagrid.log`; filter with `RUST_LOG=navigation=debug`.
fn init_tracing() -> io::Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let file = std::fs::File::create("datagrid.log")?;
    let fmt_layer = fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_target(true)
        .with_ansi(false)
        .compact();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
    tracing::info!(target: "system", "datagrid example started");
    Ok(())
}

fn columns() -> Vec<GridColumn> {
    let mut columns = vec![
        GridColumn::new("id", 6).title("ID").pinned(),
        GridColumn::new("name", 14)
            .title("Name")
            .pinned()
            .editable()
            .filterable(),
    ];
    columns.extend((0..METRICS).map(|i| {
        let column = GridColumn::new(format!("m{i:02}"), 10)
            .title(format!("metric {i:02}"))
            .filterable();
        if i % 3 == 0 {
            column.editable()
        } else {
            column
        }
    }));
    columns
}

fn rows() -> Vec<GridRow> {
    let mut rows = Vec::with_capacity(GROUPS * (ROWS_PER_GROUP + 3));
    for _ in 0..GROUPS {
        rows.push(GridRow::group_header());
        for i in 0..ROWS_PER_GROUP {
            rows.push(GridRow::data());
            if i == ROWS_PER_GROUP / 2 {
                rows.push(GridRow::detail(3));
            }
        }
        rows.push(GridRow::group_summary());
    }
    rows
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    theme: &GridTheme,
    grid: &mut DataGridView,
) -> io::Result<()> {
    let mut status = String::new();
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let block = Block::default()
                .title("DataGrid (arrows/hjkl, Home/End, Ctrl+arrows, Tab/Shift+Tab, e edit, q)")
                .borders(Borders::ALL);
            let inner = block.inner(area);
            f.render_widget(block, area);

            let buf = f.buffer_mut();
            let grid_area = Rect::new(
                inner.x,
                inner.y,
                inner.width,
                inner.height.saturating_sub(1),
            );
            let status_area = Rect::new(inner.x, inner.y + grid_area.height, inner.width, 1);

            grid.render(grid_area, buf, theme, render_cell);
            render_status(status_area, buf, theme, grid, &status);
        })?;

        for action in grid.take_deferred_actions() {
            status = describe(action);
        }

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let event = crossterm::event::read()?;
        if let Event::Key(key) = &event {
            if grid.row_in_edit().is_none() {
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('e') => {
                        if grid.begin_row_edit() {
                            status = "editing".to_string();
                        }
                        continue;
                    }
                    _ => {}
                }
            }
        }
        if let Some(ev) = input_event_from_crossterm(event) {
            match grid.handle_event(ev) {
                DataGridAction::None | DataGridAction::Redraw => {}
                action => status = describe(action),
            }
        }
    }
}

fn render_cell(area: Rect, ctx: DataGridCellContext, buf: &mut Buffer, theme: &GridTheme) {
    if area.width == 0 || area.height == 0 || ctx.clip_top > 0 {
        return;
    }
    let text = match (ctx.role, ctx.row, ctx.column) {
        (CellRole::Header, _, Some(col)) => format!("col {col}"),
        (CellRole::Filter, _, Some(_)) => "filter…".to_string(),
        (CellRole::Body(RowKind::GroupHeader), Some(row), _) => format!("▼ group at row {row}"),
        (CellRole::Body(RowKind::Detail), Some(row), _) => {
            format!("  details of row {}", row.saturating_sub(1))
        }
        (CellRole::Body(RowKind::GroupSummary), _, Some(col)) => format!("Σ c{col}"),
        (CellRole::RootSummary, _, Some(col)) => format!("total c{col}"),
        (CellRole::Body(_), Some(row), Some(col)) => format!("r{row} c{col}"),
        _ => return,
    };
    let style = if ctx.is_editing && !ctx.is_focused {
        theme.editing
    } else {
        buf[(area.x, area.y)].style()
    };
    render::render_str_clipped(area.x, area.y, ctx.clip_left, area.width, buf, &text, style);
}

fn render_status(
    area: Rect,
    buf: &mut Buffer,
    theme: &GridTheme,
    grid: &DataGridView,
    msg: &str,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let focus = match grid.focus() {
        Some(FocusTarget::Cell(c)) if c.is_summary_row => {
            format!("summary r{} c{}", c.row, c.column)
        }
        Some(FocusTarget::Cell(c)) => format!("r{} c{}", c.row, c.column),
        Some(FocusTarget::Row(r)) => format!("row {r}"),
        Some(FocusTarget::FilterCell(c)) => format!("filter c{c}"),
        None => "-".to_string(),
    };
    let pct = grid.viewport().percent_y().unwrap_or(0);
    let s = format!("focus={focus}  scroll={pct}%  {msg}");
    let span = Span::styled(s, theme.text_muted);
    buf.set_span(area.x, area.y, &span, area.width);
}

fn describe(action: DataGridAction) -> String {
    match action {
        DataGridAction::Activated(c) => format!("activated r{} c{}", c.row, c.column),
        DataGridAction::EditMoved { from, to } => format!("edit moved {from} -> {to}"),
        DataGridAction::EditSubmitted(row) => format!("row {row} submitted"),
        DataGridAction::EditCancelled(row) => format!("row {row} edit cancelled"),
        DataGridAction::None | DataGridAction::Redraw => String::new(),
    }
}
