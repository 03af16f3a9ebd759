//! Placement resolution: raw candidate slot → actual drop start slot.
//!
//! The pointer hovers some slot; where the item actually lands depends on
//! its width class. [`resolve_target`] applies the row-boundary correction
//! and bounds clamping for wide items. It is pure — identical inputs always
//! produce the identical start slot — so the runtime calls it on every
//! pointer move for live preview highlighting without any side effects.

use slotboard_core::geometry::{GeometryError, GridSpec, SlotIndex};
use slotboard_core::item::WidthClass;

/// Resolve the slot a drop at `candidate` will actually start from.
///
/// Normal items land on the candidate itself. Wide items are corrected so
/// the pair `(start, start + 1)` stays inside one row:
///
/// 1. a candidate in the last column shifts one slot left within its row;
/// 2. if that shift would escape the row (a one-column row), the start
///    stays clamped to the row's first column;
/// 3. the start is clamped into `[0, slot_count - 2]` so the pair never
///    reads past the end of the grid.
///
/// An out-of-range candidate is a caller contract violation and is
/// rejected with [`GeometryError::OutOfRange`].
pub fn resolve_target(
    spec: GridSpec,
    candidate: SlotIndex,
    width: WidthClass,
) -> Result<SlotIndex, GeometryError> {
    spec.check(candidate)?;
    match width {
        WidthClass::Normal => Ok(candidate),
        WidthClass::Wide => {
            let mut start = candidate;
            if spec.is_row_boundary(start) && spec.col_of(start) > 0 {
                start = SlotIndex(start.get() - 1);
            }
            let max_start = spec.slot_count() - 2;
            if start.get() > max_start {
                start = SlotIndex(max_start);
            }
            Ok(start)
        }
    }
}
