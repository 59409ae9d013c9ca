//! Splitting a listing into balanced columns.
//!
//! Columns are filled front to back: each takes `ceil(remaining / columns
//! left)` items, so earlier columns are at most one item longer than later
//! ones and the shares always add up to the total.
//!
//! ```
//! use thumbdir::layout::partition;
//!
//! let columns = partition(10, 3);
//! assert_eq!(columns.bounds(), &[4, 7, 10]);
//! assert_eq!(columns.shares(), vec![4, 3, 3]);
//! ```

use serde::Serialize;
use std::ops::Range;

/// Exclusive upper bound of each column, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnBounds(Vec<usize>);

impl ColumnBounds {
    pub fn bounds(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Items per column.
    pub fn shares(&self) -> Vec<usize> {
        self.ranges().map(|r| r.len()).collect()
    }

    /// Index range of each column.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        let starts = std::iter::once(0).chain(self.0.iter().copied());
        starts.zip(self.0.iter().copied()).map(|(start, end)| start..end)
    }
}

/// Partition `total` items into `columns` bounds. Zero columns yields no bounds.
pub fn partition(total: usize, columns: usize) -> ColumnBounds {
    let mut bounds = Vec::with_capacity(columns);
    let mut placed = 0;
    for column in 0..columns {
        let remaining_columns = columns - column;
        placed += (total - placed).div_ceil(remaining_columns);
        bounds.push(placed);
    }
    ColumnBounds(bounds)
}
