//! Highlighted row of the container table
//!
//! Rows are 1-based because row 0 of the visible table is the header.
//! Row 0 therefore means "nothing selected".

/// Clamp a selected row against the number of containers
pub fn clamp(row: usize, count: usize) -> usize {
    row.min(count)
}

/// Currently highlighted row, always kept within `0..=count`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    row: usize,
}

impl Selection {
    /// No row selected
    pub fn none() -> Self {
        Self { row: 0 }
    }

    /// Select `row`, clamped to `count`
    pub fn at(row: usize, count: usize) -> Self {
        Self {
            row: clamp(row, count),
        }
    }

    /// 1-based row, 0 when nothing is selected
    pub fn row(self) -> usize {
        self.row
    }

    pub fn is_none(self) -> bool {
        self.row == 0
    }

    /// 0-based index into the container list
    pub fn index(self) -> Option<usize> {
        self.row.checked_sub(1)
    }

    /// Move the highlight one row up. Never leaves row 1 and never
    /// selects anything when nothing is selected.
    pub fn move_up(&mut self) -> bool {
        if self.row > 1 {
            self.row -= 1;
            true
        } else {
            false
        }
    }

    /// Move the highlight one row down, staying on the last row
    pub fn move_down(&mut self, count: usize) -> bool {
        if self.row > 0 && self.row < count {
            self.row += 1;
            true
        } else {
            false
        }
    }

    /// Adjust the selection to a freshly installed list.
    ///
    /// The row falls down with a shrinking list. When the list goes from
    /// empty (or never fetched) to non-empty, the first row gets selected.
    pub fn reconcile(&mut self, was_empty: bool, count: usize) {
        self.row = clamp(self.row, count);
        if self.row == 0 && was_empty && count > 0 {
            self.row = 1;
        }
    }
}
