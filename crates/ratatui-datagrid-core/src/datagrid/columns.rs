//! Column layout: pinned/unpinned partitioning and visible indices.
//!
//! [`ColumnLayout`] owns the column descriptors. It assigns contiguous visible indices to leaf
//! columns, left to right over the pinned region followed by the unpinned region (or the
//! reverse with [`PinningPosition::End`]). Navigation only ever reads this ordering.

use std::collections::HashSet;

use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinningPosition {
    /// Pinned columns render at the left edge.
    #[default]
    Start,
    /// Pinned columns render at the right edge.
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnRegion {
    Pinned,
    Unpinned,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("column `{column}` refers to parent #{parent}, which does not exist")]
    DanglingParent { column: String, parent: usize },
    #[error("column `{column}` must be declared after its parent #{parent}")]
    ParentAfterChild { column: String, parent: usize },
    #[error("duplicate column key `{0}`")]
    DuplicateKey(String),
    #[error("unknown column `{0}`")]
    UnknownColumn(String),
}

/// A column as declared by the caller.
#[derive(Clone, Debug)]
pub struct GridColumn {
    pub key: String,
    pub title: String,
    pub width: u16,
    pub pinned: bool,
    pub editable: bool,
    pub filterable: bool,
    /// Index (in declaration order) of the group this column belongs to.
    pub parent: Option<usize>,
}

impl GridColumn {
    pub fn new(key: impl Into<String>, width: u16) -> Self {
        let key = key.into();
        Self {
            title: key.clone(),
            key,
            width,
            pinned: false,
            editable: false,
            filterable: false,
            parent: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn child_of(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// A resolved column.
///
/// Group columns (those some other column names as `parent`) never get a visible index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub key: String,
    pub title: String,
    pub width: u16,
    pub visible_index: Option<usize>,
    pub pinned: bool,
    pub level: usize,
    pub parent: Option<usize>,
    pub editable: bool,
    pub filterable: bool,
    pub is_group: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ColumnLayout {
    descriptors: Vec<ColumnDescriptor>,
    /// Descriptor index per visible index.
    order: Vec<usize>,
    pinned_count: usize,
    pinning: PinningPosition,
}

impl ColumnLayout {
    pub fn new(columns: Vec<GridColumn>, pinning: PinningPosition) -> Result<Self, LayoutError> {
        let mut keys = HashSet::new();
        for (i, c) in columns.iter().enumerate() {
            if !keys.insert(c.key.as_str()) {
                return Err(LayoutError::DuplicateKey(c.key.clone()));
            }
            if let Some(parent) = c.parent {
                if parent >= columns.len() {
                    return Err(LayoutError::DanglingParent {
                        column: c.key.clone(),
                        parent,
                    });
                }
                if parent >= i {
                    return Err(LayoutError::ParentAfterChild {
                        column: c.key.clone(),
                        parent,
                    });
                }
            }
        }

        let mut descriptors: Vec<ColumnDescriptor> = Vec::with_capacity(columns.len());
        for c in columns {
            let (level, pinned) = match c.parent {
                // Parents precede children, so the parent is already resolved.
                Some(p) => (descriptors[p].level + 1, descriptors[p].pinned),
                None => (0, c.pinned),
            };
            if let Some(p) = c.parent {
                descriptors[p].is_group = true;
            }
            descriptors.push(ColumnDescriptor {
                key: c.key,
                title: c.title,
                width: c.width,
                visible_index: None,
                pinned,
                level,
                parent: c.parent,
                editable: c.editable,
                filterable: c.filterable,
                is_group: false,
            });
        }

        let mut layout = Self {
            descriptors,
            order: Vec::new(),
            pinned_count: 0,
            pinning,
        };
        layout.assign_visible_indices();
        Ok(layout)
    }

    pub fn pinning(&self) -> PinningPosition {
        self.pinning
    }

    pub fn set_pinning(&mut self, pinning: PinningPosition) {
        self.pinning = pinning;
        self.assign_visible_indices();
    }

    /// Pins or unpins the column with `key`. Pinning a column inside a group moves the whole
    /// top-level group.
    pub fn set_pinned(&mut self, key: &str, pinned: bool) -> Result<(), LayoutError> {
        let idx = self
            .descriptors
            .iter()
            .position(|d| d.key == key)
            .ok_or_else(|| LayoutError::UnknownColumn(key.to_string()))?;
        let root = self.root_of(idx);
        for i in 0..self.descriptors.len() {
            if self.root_of(i) == root {
                self.descriptors[i].pinned = pinned;
            }
        }
        self.assign_visible_indices();
        Ok(())
    }

    pub fn descriptors(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    /// Number of leaf (navigable) columns.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn last_visible_index(&self) -> Option<usize> {
        self.order.len().checked_sub(1)
    }

    pub fn column(&self, visible_index: usize) -> Option<&ColumnDescriptor> {
        self.order
            .get(visible_index)
            .map(|&i| &self.descriptors[i])
    }

    /// Leaf columns in visible order.
    pub fn ordered(&self) -> impl Iterator<Item = &ColumnDescriptor> + '_ {
        self.order.iter().map(|&i| &self.descriptors[i])
    }

    pub fn pinned(&self) -> impl Iterator<Item = &ColumnDescriptor> + '_ {
        self.ordered().filter(|c| c.pinned)
    }

    pub fn unpinned(&self) -> impl Iterator<Item = &ColumnDescriptor> + '_ {
        self.ordered().filter(|c| !c.pinned)
    }

    pub fn pinned_count(&self) -> usize {
        self.pinned_count
    }

    pub fn unpinned_count(&self) -> usize {
        self.order.len() - self.pinned_count
    }

    pub fn is_pinned(&self, visible_index: usize) -> bool {
        self.column(visible_index).is_some_and(|c| c.pinned)
    }

    pub fn region(&self, visible_index: usize) -> Option<ColumnRegion> {
        self.column(visible_index).map(|c| {
            if c.pinned {
                ColumnRegion::Pinned
            } else {
                ColumnRegion::Unpinned
            }
        })
    }

    /// True when the pinned column at `visible_index` touches the unpinned region: the last
    /// pinned column with start pinning, the first one with end pinning.
    pub fn is_boundary(&self, visible_index: usize) -> bool {
        if self.pinned_count == 0 || self.unpinned_count() == 0 {
            return false;
        }
        match self.pinning {
            PinningPosition::Start => visible_index + 1 == self.pinned_count,
            PinningPosition::End => visible_index == self.unpinned_count(),
        }
    }

    /// Position of `visible_index` among the unpinned columns, the index the horizontal
    /// virtualizer works with.
    pub fn unpinned_index(&self, visible_index: usize) -> Option<usize> {
        if self.is_pinned(visible_index) || visible_index >= self.order.len() {
            return None;
        }
        match self.pinning {
            PinningPosition::Start => Some(visible_index - self.pinned_count),
            PinningPosition::End => Some(visible_index),
        }
    }

    pub fn visible_index_of_unpinned(&self, unpinned_index: usize) -> Option<usize> {
        if unpinned_index >= self.unpinned_count() {
            return None;
        }
        match self.pinning {
            PinningPosition::Start => Some(unpinned_index + self.pinned_count),
            PinningPosition::End => Some(unpinned_index),
        }
    }

    /// Scans from `start` (inclusive) towards the end (`forward`) or the start of the
    /// ordering and returns the first editable column.
    pub fn next_editable(&self, start: usize, forward: bool) -> Option<usize> {
        if forward {
            (start..self.order.len()).find(|&c| self.is_editable(c))
        } else {
            if self.order.is_empty() {
                return None;
            }
            (0..=start.min(self.order.len() - 1))
                .rev()
                .find(|&c| self.is_editable(c))
        }
    }

    pub fn first_editable(&self) -> Option<usize> {
        self.next_editable(0, true)
    }

    pub fn last_editable(&self) -> Option<usize> {
        self.last_visible_index()
            .and_then(|last| self.next_editable(last, false))
    }

    /// Visible indices of unpinned filterable columns, in order.
    pub fn unpinned_filterable(&self) -> Vec<usize> {
        self.ordered()
            .filter(|c| !c.pinned && c.filterable)
            .filter_map(|c| c.visible_index)
            .collect()
    }

    /// Visible indices of all filterable columns, in order.
    pub fn filterable(&self) -> Vec<usize> {
        self.ordered()
            .filter(|c| c.filterable)
            .filter_map(|c| c.visible_index)
            .collect()
    }

    /// Widths of the unpinned columns in unpinned order.
    pub fn unpinned_widths(&self) -> Vec<u32> {
        self.unpinned().map(|c| c.width as u32).collect()
    }

    /// Total width of the pinned region, including one gap after every pinned column.
    pub fn pinned_width(&self, gap: u16) -> u16 {
        self.pinned()
            .fold(0u16, |acc, c| acc.saturating_add(c.width).saturating_add(gap))
    }

    fn is_editable(&self, visible_index: usize) -> bool {
        self.column(visible_index).is_some_and(|c| c.editable)
    }

    fn root_of(&self, mut idx: usize) -> usize {
        while let Some(p) = self.descriptors[idx].parent {
            idx = p;
        }
        idx
    }

    fn assign_visible_indices(&mut self) {
        let leaves: Vec<usize> = (0..self.descriptors.len())
            .filter(|&i| !self.descriptors[i].is_group)
            .collect();
        let pinned = leaves
            .iter()
            .copied()
            .filter(|&i| self.descriptors[i].pinned);
        let unpinned = leaves
            .iter()
            .copied()
            .filter(|&i| !self.descriptors[i].pinned);
        self.order = match self.pinning {
            PinningPosition::Start => pinned.chain(unpinned).collect(),
            PinningPosition::End => unpinned.chain(pinned).collect(),
        };
        self.pinned_count = leaves
            .iter()
            .filter(|&&i| self.descriptors[i].pinned)
            .count();

        for d in &mut self.descriptors {
            d.visible_index = None;
        }
        for (visible, &i) in self.order.iter().enumerate() {
            self.descriptors[i].visible_index = Some(visible);
        }
    }
}
