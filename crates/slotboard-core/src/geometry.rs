//! Grid topology: linear slot indices, rows, columns, and row boundaries.
//!
//! Every row/column computation in the engine goes through [`GridSpec`];
//! no other component recomputes wrap arithmetic. All functions here are
//! pure and total over the valid index range `[0, slot_count)`; indices
//! outside that range are a caller contract violation rejected by
//! [`GridSpec::check`] at API boundaries.
//!
//! # Invariants
//!
//! 1. `columns ≥ 1` and `slot_count ≥ 2` for any constructed [`GridSpec`].
//! 2. When `columns ≥ 2`, the final row has at least two slots, so a wide
//!    (two-cell) placement always has a same-row home after resolution.
//! 3. `index_of(row_of(i), col_of(i)) == i` for every in-range `i`.

use std::fmt;

// ---------------------------------------------------------------------------
// SlotIndex
// ---------------------------------------------------------------------------

/// A grid cell addressed by 0-based linear index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SlotIndex(pub u16);

impl SlotIndex {
    /// Create a slot index from a raw linear index.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// The raw linear index.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// The slot immediately to the right in linear order.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for SlotIndex {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from grid construction and index checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// A slot index outside `[0, slot_count)` was requested.
    OutOfRange { index: SlotIndex, slot_count: u16 },
    /// The grid shape cannot host the engine's placements.
    InvalidSpec { columns: u16, slot_count: u16 },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, slot_count } => {
                write!(f, "slot index {index} outside grid of {slot_count} slots")
            }
            Self::InvalidSpec {
                columns,
                slot_count,
            } => write!(
                f,
                "invalid grid shape: {columns} columns, {slot_count} slots"
            ),
        }
    }
}

impl std::error::Error for GeometryError {}

// ---------------------------------------------------------------------------
// GridSpec
// ---------------------------------------------------------------------------

/// A fixed grid shape: column count and total slot count.
///
/// Construction validates the shape once; the accessors are then total over
/// in-range indices and never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    columns: u16,
    slot_count: u16,
}

impl GridSpec {
    /// Create a grid spec, validating the shape.
    ///
    /// Rejected shapes: zero columns, fewer than two slots, and (for grids
    /// of two or more columns) a final row containing a single slot. The
    /// last rule guarantees a wide item's resolved slot pair always has a
    /// same-row home.
    pub fn new(columns: u16, slot_count: u16) -> Result<Self, GeometryError> {
        if columns == 0 || slot_count < 2 || (columns >= 2 && slot_count % columns == 1) {
            return Err(GeometryError::InvalidSpec {
                columns,
                slot_count,
            });
        }
        Ok(Self {
            columns,
            slot_count,
        })
    }

    /// Column count.
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> u16 {
        self.columns
    }

    /// Total slot count.
    #[inline]
    #[must_use]
    pub const fn slot_count(&self) -> u16 {
        self.slot_count
    }

    /// Number of rows (the final row may be partial).
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.slot_count.div_ceil(self.columns)
    }

    /// Row of a slot.
    #[inline]
    #[must_use]
    pub const fn row_of(&self, index: SlotIndex) -> u16 {
        index.0 / self.columns
    }

    /// Column of a slot.
    #[inline]
    #[must_use]
    pub const fn col_of(&self, index: SlotIndex) -> u16 {
        index.0 % self.columns
    }

    /// True iff the slot sits in the last column of its row.
    #[inline]
    #[must_use]
    pub const fn is_row_boundary(&self, index: SlotIndex) -> bool {
        self.col_of(index) == self.columns - 1
    }

    /// The linear index of `(row, col)`.
    #[inline]
    #[must_use]
    pub const fn index_of(&self, row: u16, col: u16) -> SlotIndex {
        SlotIndex(row * self.columns + col)
    }

    /// Whether `index` addresses a slot in this grid.
    #[inline]
    #[must_use]
    pub const fn contains(&self, index: SlotIndex) -> bool {
        index.0 < self.slot_count
    }

    /// Reject an out-of-range index at the API boundary.
    pub fn check(&self, index: SlotIndex) -> Result<SlotIndex, GeometryError> {
        if self.contains(index) {
            Ok(index)
        } else {
            Err(GeometryError::OutOfRange {
                index,
                slot_count: self.slot_count,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn row_and_col_of_five_column_grid() {
        let spec = GridSpec::new(5, 10).unwrap();
        assert_eq!(spec.rows(), 2);
        assert_eq!(spec.row_of(SlotIndex(0)), 0);
        assert_eq!(spec.col_of(SlotIndex(0)), 0);
        assert_eq!(spec.row_of(SlotIndex(4)), 0);
        assert_eq!(spec.col_of(SlotIndex(4)), 4);
        assert_eq!(spec.row_of(SlotIndex(9)), 1);
        assert_eq!(spec.col_of(SlotIndex(9)), 4);
    }

    #[test]
    fn row_boundary_is_last_column_only() {
        let spec = GridSpec::new(5, 10).unwrap();
        let boundaries: Vec<u16> = (0..10)
            .filter(|&i| spec.is_row_boundary(SlotIndex(i)))
            .collect();
        assert_eq!(boundaries, vec![4, 9]);
    }

    #[test]
    fn invalid_shapes_rejected() {
        assert!(GridSpec::new(0, 10).is_err());
        assert!(GridSpec::new(5, 0).is_err());
        assert!(GridSpec::new(5, 1).is_err());
        // 11 slots over 5 columns leaves a lone slot in the final row.
        assert!(GridSpec::new(5, 11).is_err());
        // 12 leaves two, which a wide pair can still occupy.
        assert!(GridSpec::new(5, 12).is_ok());
        // Single-column grids are legal (wide items just never fit).
        assert!(GridSpec::new(1, 4).is_ok());
    }

    #[test]
    fn check_rejects_out_of_range() {
        let spec = GridSpec::new(5, 10).unwrap();
        assert_eq!(spec.check(SlotIndex(9)), Ok(SlotIndex(9)));
        assert_eq!(
            spec.check(SlotIndex(10)),
            Err(GeometryError::OutOfRange {
                index: SlotIndex(10),
                slot_count: 10
            })
        );
    }

    proptest! {
        #[test]
        fn index_round_trips_through_row_col(
            columns in 1u16..32,
            rows in 1u16..32,
            raw in 0u16..1024,
        ) {
            let slot_count = columns.saturating_mul(rows).max(2);
            let Ok(spec) = GridSpec::new(columns, slot_count) else {
                return Ok(());
            };
            let index = SlotIndex(raw % slot_count);
            let back = spec.index_of(spec.row_of(index), spec.col_of(index));
            prop_assert_eq!(back, index);
        }
    }
}
