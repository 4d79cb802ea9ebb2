/// A focus target inside the grid.
///
/// `column` is a *visible* index (position in the pinned + unpinned ordering), not an index
/// into the caller's data. `row` is an index into the logical row sequence; the root summary
/// row sits right after the last body row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub row: usize,
    pub column: usize,
    pub is_summary_row: bool,
}

impl Coordinate {
    pub fn new(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            is_summary_row: false,
        }
    }

    pub fn summary(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            is_summary_row: true,
        }
    }

    pub fn with_column(self, column: usize) -> Self {
        Self { column, ..self }
    }
}
