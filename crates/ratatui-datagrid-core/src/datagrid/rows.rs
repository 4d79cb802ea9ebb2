/// What a body row represents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RowKind {
    #[default]
    Data,
    /// Synthetic header of a group-by group; focused as a whole row.
    GroupHeader,
    /// Synthetic master-detail row; focused as a whole row.
    Detail,
    /// Per-group summary; has cells like a data row.
    GroupSummary,
}

impl RowKind {
    /// Synthetic rows span the whole width and have no column dimension.
    pub fn is_synthetic(self) -> bool {
        matches!(self, RowKind::GroupHeader | RowKind::Detail)
    }

    pub fn is_summary(self) -> bool {
        matches!(self, RowKind::GroupSummary)
    }
}

/// The logical row sequence of a grid body.
pub trait RowSource {
    fn len(&self) -> usize;

    fn kind(&self, index: usize) -> Option<RowKind>;

    /// Row height in terminal cells.
    fn height(&self, _index: usize) -> u32 {
        1
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Heights of all rows, in the form the vertical virtualizer takes.
    fn heights(&self) -> Vec<u32> {
        (0..self.len()).map(|i| self.height(i).max(1)).collect()
    }

    fn first_data_row(&self) -> Option<usize> {
        (0..self.len()).find(|&i| self.kind(i) == Some(RowKind::Data))
    }

    fn last_data_row(&self) -> Option<usize> {
        (0..self.len())
            .rev()
            .find(|&i| self.kind(i) == Some(RowKind::Data))
    }

    /// Nearest data row after (`forward`) or before `from`, exclusive.
    fn adjacent_data_row(&self, from: usize, forward: bool) -> Option<usize> {
        if forward {
            (from.saturating_add(1)..self.len()).find(|&i| self.kind(i) == Some(RowKind::Data))
        } else {
            (0..from.min(self.len()))
                .rev()
                .find(|&i| self.kind(i) == Some(RowKind::Data))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridRow {
    pub kind: RowKind,
    pub height: u32,
}

impl GridRow {
    pub fn data() -> Self {
        Self {
            kind: RowKind::Data,
            height: 1,
        }
    }

    pub fn group_header() -> Self {
        Self {
            kind: RowKind::GroupHeader,
            height: 1,
        }
    }

    pub fn detail(height: u32) -> Self {
        Self {
            kind: RowKind::Detail,
            height: height.max(1),
        }
    }

    pub fn group_summary() -> Self {
        Self {
            kind: RowKind::GroupSummary,
            height: 1,
        }
    }
}

/// An owned row sequence.
#[derive(Clone, Debug, Default)]
pub struct GridRows {
    rows: Vec<GridRow>,
}

impl GridRows {
    pub fn new(rows: Vec<GridRow>) -> Self {
        Self { rows }
    }

    /// `count` plain data rows of height one.
    pub fn data(count: usize) -> Self {
        Self {
            rows: vec![GridRow::data(); count],
        }
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }
}

impl From<Vec<GridRow>> for GridRows {
    fn from(rows: Vec<GridRow>) -> Self {
        Self::new(rows)
    }
}

impl RowSource for GridRows {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn kind(&self, index: usize) -> Option<RowKind> {
        self.rows.get(index).map(|r| r.kind)
    }

    fn height(&self, index: usize) -> u32 {
        self.rows.get(index).map(|r| r.height.max(1)).unwrap_or(1)
    }
}
