//! Per-axis virtualization.
//!
//! [`AxisVirtualizer`] is what the navigation coordinator needs from a scroll container: item
//! geometry, the current scroll snapshot, a scroll-to request and a "was this index rendered"
//! query. [`VirtualAxis`] implements it on top of the `virtualizer` crate.

use std::sync::Arc;

use virtualizer::Align;
use virtualizer::VirtualItem;
use virtualizer::Virtualizer;
use virtualizer::VirtualizerOptions;

pub trait AxisVirtualizer {
    fn count(&self) -> usize;

    fn scroll_offset(&self) -> u64;

    /// Size of the scroll container along this axis.
    fn viewport_size(&self) -> u32;

    /// Offset of the item's leading edge from the start of the content.
    fn start_of(&self, index: usize) -> Option<u64>;

    fn size_at(&self, index: usize) -> Option<u32>;

    /// Scroll offset that aligns `index` with the start of the viewport, or with its end when
    /// `align_end` is set. Clamped to the scrollable range.
    fn scroll_for_index(&self, index: usize, align_end: bool) -> Option<u64>;

    /// Requests that `index` be scrolled into view. The new content becomes available after
    /// the next render.
    fn scroll_to(&mut self, index: usize);

    /// Whether `index` was part of the last rendered chunk.
    fn is_rendered(&self, index: usize) -> bool;

    fn end_of(&self, index: usize) -> Option<u64> {
        Some(self.start_of(index)? + self.size_at(index)? as u64)
    }

    fn is_start_visible(&self, index: usize) -> bool {
        if self.viewport_size() == 0 {
            return true;
        }
        self.start_of(index)
            .is_some_and(|start| self.scroll_offset() <= start)
    }

    fn is_end_visible(&self, index: usize) -> bool {
        if self.viewport_size() == 0 {
            return true;
        }
        self.end_of(index).is_some_and(|end| {
            self.viewport_size() as i64 >= end as i64 - self.scroll_offset() as i64
        })
    }

    fn is_fully_visible(&self, index: usize) -> bool {
        self.is_start_visible(index) && self.is_end_visible(index)
    }

    /// Fully visible, or larger than the viewport and covering all of it. For such an item the
    /// offset lies between its start-aligned and end-aligned scroll positions.
    fn is_in_view(&self, index: usize) -> bool {
        if self.is_fully_visible(index) {
            return true;
        }
        let (Some(first), Some(last)) = (
            self.scroll_for_index(index, false),
            self.scroll_for_index(index, true),
        ) else {
            return false;
        };
        (first..=last).contains(&self.scroll_offset())
    }
}

/// An [`AxisVirtualizer`] backed by [`virtualizer::Virtualizer`].
pub struct VirtualAxis {
    virtualizer: Virtualizer,
    sizes: Arc<Vec<u32>>,
    starts: Vec<u64>,
    gap: u32,
    overscan: usize,
    viewport: u32,
    items: Vec<VirtualItem>,
}

impl Default for VirtualAxis {
    fn default() -> Self {
        Self::new(Vec::new(), 0, 2)
    }
}

impl std::fmt::Debug for VirtualAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualAxis")
            .field("count", &self.sizes.len())
            .field("viewport", &self.viewport)
            .field("scroll_offset", &self.virtualizer.scroll_offset())
            .field("rendered", &self.items.len())
            .finish()
    }
}

impl VirtualAxis {
    pub fn new(sizes: Vec<u32>, gap: u32, overscan: usize) -> Self {
        let sizes = Arc::new(normalize(sizes));
        let virtualizer = make_virtualizer(sizes.clone(), gap, overscan);
        let starts = prefix_starts(&sizes, gap);
        Self {
            virtualizer,
            sizes,
            starts,
            gap,
            overscan,
            viewport: 0,
            items: Vec::new(),
        }
    }

    /// Replaces item sizes, keeping viewport and scroll offset.
    pub fn set_sizes(&mut self, sizes: Vec<u32>) {
        let offset = self.virtualizer.scroll_offset();
        self.sizes = Arc::new(normalize(sizes));
        self.starts = prefix_starts(&self.sizes, self.gap);
        self.virtualizer = make_virtualizer(self.sizes.clone(), self.gap, self.overscan);
        self.virtualizer.set_viewport_size(self.viewport);
        self.set_scroll_offset(offset);
        self.items.clear();
    }

    pub fn set_gap(&mut self, gap: u32) {
        if gap != self.gap {
            self.gap = gap;
            let sizes = self.sizes.as_ref().clone();
            self.set_sizes(sizes);
        }
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
        self.virtualizer.set_overscan(overscan);
    }

    pub fn set_viewport_size(&mut self, size: u32) {
        self.viewport = size;
        self.virtualizer.set_viewport_size(size);
        let offset = self.virtualizer.scroll_offset();
        self.set_scroll_offset(offset);
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        self.virtualizer
            .set_scroll_offset(offset.min(self.max_scroll()));
    }

    pub fn scroll_by(&mut self, delta: i64) {
        let next = (self.virtualizer.scroll_offset() as i64 + delta).max(0) as u64;
        self.set_scroll_offset(next);
    }

    pub fn total_size(&self) -> u64 {
        match self.sizes.last() {
            Some(&last) => self.starts[self.starts.len() - 1] + last as u64,
            None => 0,
        }
    }

    pub fn max_scroll(&self) -> u64 {
        self.total_size().saturating_sub(self.viewport as u64)
    }

    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        self.virtualizer.index_at_offset(offset)
    }

    /// Computes the rendered chunk for the current scroll offset.
    pub fn layout(&mut self) -> &[VirtualItem] {
        self.virtualizer.collect_virtual_items(&mut self.items);
        &self.items
    }

    /// Items of the last [`layout`](Self::layout) call.
    pub fn items(&self) -> &[VirtualItem] {
        &self.items
    }
}

impl AxisVirtualizer for VirtualAxis {
    fn count(&self) -> usize {
        self.sizes.len()
    }

    fn scroll_offset(&self) -> u64 {
        self.virtualizer.scroll_offset()
    }

    fn viewport_size(&self) -> u32 {
        self.viewport
    }

    fn start_of(&self, index: usize) -> Option<u64> {
        self.starts.get(index).copied()
    }

    fn size_at(&self, index: usize) -> Option<u32> {
        self.sizes.get(index).copied()
    }

    fn scroll_for_index(&self, index: usize, align_end: bool) -> Option<u64> {
        let start = self.start_of(index)?;
        let offset = if align_end {
            (start + self.size_at(index)? as u64).saturating_sub(self.viewport as u64)
        } else {
            start
        };
        Some(offset.min(self.max_scroll()))
    }

    fn scroll_to(&mut self, index: usize) {
        if index >= self.sizes.len() {
            return;
        }
        self.virtualizer.scroll_to_index(index, Align::Auto);
        let offset = self.virtualizer.scroll_offset();
        self.set_scroll_offset(offset);
    }

    fn is_rendered(&self, index: usize) -> bool {
        self.items.iter().any(|item| item.index == index)
    }
}

fn make_virtualizer(sizes: Arc<Vec<u32>>, gap: u32, overscan: usize) -> Virtualizer {
    let count = sizes.len();
    let mut opts = VirtualizerOptions::new(count, move |i| sizes.get(i).copied().unwrap_or(1));
    opts.gap = gap;
    opts.overscan = overscan;
    Virtualizer::new(opts)
}

/// Items are at least one cell along the axis.
fn normalize(sizes: Vec<u32>) -> Vec<u32> {
    sizes.into_iter().map(|s| s.max(1)).collect()
}

fn prefix_starts(sizes: &[u32], gap: u32) -> Vec<u64> {
    let mut starts = Vec::with_capacity(sizes.len());
    let mut acc = 0u64;
    for &size in sizes {
        starts.push(acc);
        acc += size as u64 + gap as u64;
    }
    starts
}
