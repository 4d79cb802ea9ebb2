/// Scroll container geometry of a grid, as read by navigation and the scrollbar.
///
/// `scroll_left` and `container_width` describe the unpinned region only: pinned columns never
/// scroll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportSnapshot {
    pub scroll_left: u64,
    pub scroll_top: u64,
    pub container_width: u16,
    pub container_height: u16,
    pub content_width: u64,
    pub content_height: u64,
}

impl ViewportSnapshot {
    pub fn max_scroll_top(&self) -> u64 {
        self.content_height
            .saturating_sub(self.container_height as u64)
    }

    pub fn max_scroll_left(&self) -> u64 {
        self.content_width.saturating_sub(self.container_width as u64)
    }

    pub fn can_scroll_y(&self) -> bool {
        self.max_scroll_top() > 0
    }

    pub fn can_scroll_x(&self) -> bool {
        self.max_scroll_left() > 0
    }

    /// How far down the visible bottom edge is, in percent of the content.
    pub fn percent_y(&self) -> Option<u8> {
        if self.container_height == 0 || !self.can_scroll_y() {
            return None;
        }
        let visible_bottom = self.scroll_top.saturating_add(self.container_height as u64) as f64;
        let pct = (visible_bottom / self.content_height as f64 * 100.0).round();
        Some(pct.clamp(0.0, 100.0) as u8)
    }
}
