use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;

use crate::viewport::ViewportSnapshot;

const TAB_WIDTH: usize = 4;

/// Draws a vertical scrollbar for the body rows of `viewport`.
pub fn render_scrollbar(area: Rect, buf: &mut Buffer, viewport: &ViewportSnapshot, style: Style) {
    buf.set_style(area, style);
    if area.height == 0 {
        return;
    }
    if !viewport.can_scroll_y() || viewport.container_height == 0 {
        for dy in 0..area.height {
            buf.set_stringn(area.x, area.y + dy, " ", 1, style);
        }
        return;
    }

    let track_h = area.height as f64;
    let thumb_h = ((viewport.container_height as f64 / viewport.content_height as f64) * track_h)
        .round()
        .clamp(1.0, track_h) as u16;
    let max_top = viewport.max_scroll_top().max(1) as f64;
    let thumb_top = ((viewport.scroll_top as f64 / max_top) * (track_h - thumb_h as f64))
        .round()
        .clamp(0.0, (track_h - thumb_h as f64).max(0.0)) as u16;

    for dy in 0..area.height {
        let ch = if dy >= thumb_top && dy < thumb_top + thumb_h {
            "█"
        } else {
            " "
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

/// Writes `input` at `(x, y)`, skipping its first `start_col` display columns and writing at
/// most `max_cols`. Wide characters cut by either edge are dropped.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) {
    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut out = 0usize;
    let mut tmp = [0u8; 4];

    for ch in input.chars() {
        let (symbol, w): (&str, usize) = if ch == '\t' {
            (" ", 1)
        } else {
            match UnicodeWidthChar::width(ch) {
                Some(0) | None => continue,
                Some(w) => (ch.encode_utf8(&mut tmp), w),
            }
        };
        let repeat = if ch == '\t' { TAB_WIDTH } else { 1 };
        for _ in 0..repeat {
            if col < start_col {
                col += w;
                continue;
            }
            if out + w > max_cols {
                return;
            }
            let cx = x + out as u16;
            if let Some(cell) = buf.cell_mut((cx, y)) {
                cell.set_style(style);
                cell.set_symbol(symbol);
            }
            if w == 2 {
                if let Some(cell) = buf.cell_mut((cx + 1, y)) {
                    cell.set_style(style);
                    cell.set_symbol("");
                }
            }
            out += w;
            col += w;
        }
    }
}

pub fn slice_by_cols(input: &str, start_col: u32, max_cols: u16) -> String {
    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut width = 0usize;
    let mut out = String::new();

    for ch in input.chars() {
        let (ch, w, repeat) = if ch == '\t' {
            (' ', 1, TAB_WIDTH)
        } else {
            match UnicodeWidthChar::width(ch) {
                Some(0) | None => continue,
                Some(w) => (ch, w, 1),
            }
        };
        for _ in 0..repeat {
            if col < start_col {
                col += w;
                continue;
            }
            if width + w > max_cols {
                return out;
            }
            out.push(ch);
            col += w;
            width += w;
        }
    }
    out
}

/// Horizontal placement of an item at `start..start + size` in a region scrolled by
/// `scroll`. Returns the on-screen rect and the number of leading columns cut off.
pub fn clipped_rect_x(area: Rect, scroll: u64, start: u64, size: u32) -> (Rect, u32) {
    let rel = start as i64 - scroll as i64;
    let clip = (-rel).max(0) as u32;
    let x = rel.clamp(0, area.width as i64) as u16;
    let max_w = area.width.saturating_sub(x);
    let w = size.saturating_sub(clip).min(max_w as u32) as u16;
    (Rect::new(area.x + x, area.y, w, area.height), clip)
}

/// Vertical counterpart of [`clipped_rect_x`].
pub fn clipped_rect_y(area: Rect, scroll: u64, start: u64, size: u32) -> (Rect, u32) {
    let rel = start as i64 - scroll as i64;
    let clip = (-rel).max(0) as u32;
    let y = rel.clamp(0, area.height as i64) as u16;
    let max_h = area.height.saturating_sub(y);
    let h = size.saturating_sub(clip).min(max_h as u32) as u16;
    (Rect::new(area.x, area.y + y, area.width, h), clip)
}

pub fn draw_vertical_rule(buf: &mut Buffer, x: u16, y: u16, height: u16, style: Style) {
    for dy in 0..height {
        buf.set_stringn(x, y + dy, "│", 1, style);
    }
}
