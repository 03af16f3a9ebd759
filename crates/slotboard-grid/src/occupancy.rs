//! The occupancy store: authoritative slot→item and item→placement state.
//!
//! All grid mutation goes through [`OccupancyStore::commit`], which is
//! all-or-nothing: the proposed end state is validated in full against a
//! scratch copy before anything is applied, so a rejected commit leaves the
//! store byte-for-byte unchanged.
//!
//! # Invariants
//!
//! 1. At most one item occupies any slot (no two items' slot sets intersect).
//! 2. A wide placement's two slots are same-row adjacent.
//! 3. Every registered item has exactly one placement; `Held` counts.
//! 4. The slot vector and the item index always agree: an item's placement
//!    slots are exactly the slots that map back to it.
//!
//! # Failure Modes
//!
//! - A commit naming an unregistered item, a duplicate item, a mismatched
//!   width, an out-of-range slot, a row-spanning wide pair, or an overlap
//!   fails with the corresponding [`OccupancyError`] and changes nothing.

use std::fmt;

use rustc_hash::FxHashMap;
use slotboard_core::geometry::{GeometryError, GridSpec, SlotIndex};
use slotboard_core::item::{ItemId, Placement, WidthClass};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from occupancy reads and mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyError {
    /// A slot index outside the grid was referenced.
    OutOfRange { index: SlotIndex, slot_count: u16 },
    /// A wide placement would span a row boundary.
    RowSpan { start: SlotIndex },
    /// Two items would occupy the same slot.
    Overlap {
        slot: SlotIndex,
        first: ItemId,
        second: ItemId,
    },
    /// The item has not been registered with the store.
    UnknownItem { item: ItemId },
    /// The item is already registered (or listed twice in one commit).
    DuplicateItem { item: ItemId },
    /// The placement shape does not match the item's width class.
    WidthMismatch { item: ItemId, width: WidthClass },
}

impl fmt::Display for OccupancyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, slot_count } => {
                write!(f, "slot index {index} outside grid of {slot_count} slots")
            }
            Self::RowSpan { start } => {
                write!(f, "wide placement at slot {start} would span a row boundary")
            }
            Self::Overlap {
                slot,
                first,
                second,
            } => write!(f, "{first} and {second} would both occupy slot {slot}"),
            Self::UnknownItem { item } => write!(f, "{item} is not registered"),
            Self::DuplicateItem { item } => write!(f, "{item} listed more than once"),
            Self::WidthMismatch { item, width } => {
                write!(f, "placement shape does not fit {item} ({width:?})")
            }
        }
    }
}

impl std::error::Error for OccupancyError {}

// ---------------------------------------------------------------------------
// OccupancyStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct ItemState {
    width: WidthClass,
    placement: Placement,
}

/// Authoritative placement state for a fixed grid.
///
/// Items are registered once at setup via [`insert_item`](Self::insert_item)
/// and relocated afterwards only through [`commit`](Self::commit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyStore {
    spec: GridSpec,
    slots: Vec<Option<ItemId>>,
    items: FxHashMap<ItemId, ItemState>,
}

impl OccupancyStore {
    /// Create an empty store for the given grid shape.
    #[must_use]
    pub fn new(spec: GridSpec) -> Self {
        Self {
            spec,
            slots: vec![None; spec.slot_count() as usize],
            items: FxHashMap::default(),
        }
    }

    /// The grid shape this store was built for.
    #[inline]
    #[must_use]
    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    /// Number of registered items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// The item occupying `slot`, if any.
    pub fn occupant_at(&self, slot: SlotIndex) -> Result<Option<ItemId>, OccupancyError> {
        self.spec.check(slot).map_err(geometry_to_occupancy)?;
        Ok(self.slots[slot.get() as usize])
    }

    /// The current placement of `item`, or `None` if unregistered.
    #[must_use]
    pub fn placement_of(&self, item: ItemId) -> Option<Placement> {
        self.items.get(&item).map(|s| s.placement)
    }

    /// The width class of `item`, or `None` if unregistered.
    #[must_use]
    pub fn width_of(&self, item: ItemId) -> Option<WidthClass> {
        self.items.get(&item).map(|s| s.width)
    }

    /// Iterate over `(item, width, placement)` for every registered item.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, WidthClass, Placement)> + '_ {
        self.items
            .iter()
            .map(|(id, s)| (*id, s.width, s.placement))
    }

    /// Iterate over every slot and its occupant, in linear order. This is
    /// the renderer's view of the grid.
    pub fn slots(&self) -> impl Iterator<Item = (SlotIndex, Option<ItemId>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, occ)| (SlotIndex(i as u16), *occ))
    }

    /// Iterate over the items currently in the holding area.
    pub fn held_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items
            .iter()
            .filter(|(_, s)| s.placement.is_held())
            .map(|(id, _)| *id)
    }

    /// Register a new item with its initial placement.
    ///
    /// Items are created by the external setup; the store learns about each
    /// exactly once. Rejects duplicates and any placement the grid cannot
    /// legally hold.
    pub fn insert_item(
        &mut self,
        item: ItemId,
        width: WidthClass,
        placement: Placement,
    ) -> Result<(), OccupancyError> {
        if self.items.contains_key(&item) {
            return Err(OccupancyError::DuplicateItem { item });
        }
        self.validate_shape(item, width, placement)?;
        for slot in placement.slots() {
            if let Some(existing) = self.slots[slot.get() as usize] {
                return Err(OccupancyError::Overlap {
                    slot,
                    first: existing,
                    second: item,
                });
            }
        }
        for slot in placement.slots() {
            self.slots[slot.get() as usize] = Some(item);
        }
        self.items.insert(item, ItemState { width, placement });
        Ok(())
    }

    /// Atomically replace the placements of the listed items.
    ///
    /// Validate-then-apply: the full resulting state is checked against a
    /// scratch slot map first, and on any error the store is left exactly as
    /// it was. An empty move list is a valid no-op commit.
    pub fn commit(&mut self, moves: &[(ItemId, Placement)]) -> Result<(), OccupancyError> {
        // Per-move shape checks, plus duplicate detection.
        for (i, (item, placement)) in moves.iter().enumerate() {
            let Some(state) = self.items.get(item) else {
                return Err(OccupancyError::UnknownItem { item: *item });
            };
            self.validate_shape(*item, state.width, *placement)?;
            if moves[..i].iter().any(|(prev, _)| prev == item) {
                return Err(OccupancyError::DuplicateItem { item: *item });
            }
        }

        // Build the proposed slot map on scratch.
        let mut scratch = self.slots.clone();
        for (item, _) in moves {
            for slot in self.items[item].placement.slots() {
                scratch[slot.get() as usize] = None;
            }
        }
        for (item, placement) in moves {
            for slot in placement.slots() {
                if let Some(existing) = scratch[slot.get() as usize] {
                    return Err(OccupancyError::Overlap {
                        slot,
                        first: existing,
                        second: *item,
                    });
                }
                scratch[slot.get() as usize] = Some(*item);
            }
        }

        // Apply.
        self.slots = scratch;
        for (item, placement) in moves {
            if let Some(state) = self.items.get_mut(item) {
                state.placement = *placement;
            }
        }
        Ok(())
    }

    /// Unchecked slot read for planners inside this crate. The caller
    /// guarantees `slot` is in range (resolved placements always are).
    pub(crate) fn occupant_raw(&self, slot: SlotIndex) -> Option<ItemId> {
        self.slots.get(slot.get() as usize).copied().flatten()
    }

    pub(crate) fn slots_raw(&self) -> &[Option<ItemId>] {
        &self.slots
    }

    fn validate_shape(
        &self,
        item: ItemId,
        width: WidthClass,
        placement: Placement,
    ) -> Result<(), OccupancyError> {
        if !placement.fits_width(width) {
            return Err(OccupancyError::WidthMismatch { item, width });
        }
        match placement {
            Placement::Held => Ok(()),
            Placement::Slotted(start) => {
                self.spec.check(start).map_err(geometry_to_occupancy)?;
                Ok(())
            }
            Placement::SlottedWide(start) => {
                self.spec.check(start).map_err(geometry_to_occupancy)?;
                self.spec
                    .check(start.next())
                    .map_err(geometry_to_occupancy)?;
                if self.spec.row_of(start) != self.spec.row_of(start.next()) {
                    return Err(OccupancyError::RowSpan { start });
                }
                Ok(())
            }
        }
    }
}

fn geometry_to_occupancy(err: GeometryError) -> OccupancyError {
    match err {
        GeometryError::OutOfRange { index, slot_count } => {
            OccupancyError::OutOfRange { index, slot_count }
        }
        // GridSpec::check only reports OutOfRange; this arm is unreachable.
        GeometryError::InvalidSpec { slot_count, .. } => OccupancyError::OutOfRange {
            index: SlotIndex(slot_count),
            slot_count,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> GridSpec {
        GridSpec::new(5, 10).unwrap()
    }

    fn id(raw: u64) -> ItemId {
        ItemId::new(raw).unwrap()
    }

    #[test]
    fn insert_and_read_back() {
        let mut store = OccupancyStore::new(spec());
        store
            .insert_item(id(1), WidthClass::Normal, Placement::Slotted(SlotIndex(2)))
            .unwrap();
        store
            .insert_item(id(2), WidthClass::Wide, Placement::SlottedWide(SlotIndex(5)))
            .unwrap();
        store
            .insert_item(id(3), WidthClass::Normal, Placement::Held)
            .unwrap();

        assert_eq!(store.occupant_at(SlotIndex(2)).unwrap(), Some(id(1)));
        assert_eq!(store.occupant_at(SlotIndex(5)).unwrap(), Some(id(2)));
        assert_eq!(store.occupant_at(SlotIndex(6)).unwrap(), Some(id(2)));
        assert_eq!(store.occupant_at(SlotIndex(0)).unwrap(), None);
        assert_eq!(store.placement_of(id(3)), Some(Placement::Held));
        assert_eq!(store.held_items().collect::<Vec<_>>(), vec![id(3)]);

        let occupied: Vec<SlotIndex> = store
            .slots()
            .filter_map(|(slot, occ)| occ.map(|_| slot))
            .collect();
        assert_eq!(occupied, vec![SlotIndex(2), SlotIndex(5), SlotIndex(6)]);
    }

    #[test]
    fn insert_rejects_duplicates_and_overlap() {
        let mut store = OccupancyStore::new(spec());
        store
            .insert_item(id(1), WidthClass::Normal, Placement::Slotted(SlotIndex(2)))
            .unwrap();
        assert_eq!(
            store.insert_item(id(1), WidthClass::Normal, Placement::Held),
            Err(OccupancyError::DuplicateItem { item: id(1) })
        );
        assert_eq!(
            store.insert_item(id(2), WidthClass::Wide, Placement::SlottedWide(SlotIndex(1))),
            Err(OccupancyError::Overlap {
                slot: SlotIndex(2),
                first: id(1),
                second: id(2),
            })
        );
    }

    #[test]
    fn wide_insert_rejects_row_span() {
        let mut store = OccupancyStore::new(spec());
        // Slots 4 and 5 sit in different rows of a 5-column grid.
        assert_eq!(
            store.insert_item(id(1), WidthClass::Wide, Placement::SlottedWide(SlotIndex(4))),
            Err(OccupancyError::RowSpan {
                start: SlotIndex(4)
            })
        );
    }

    #[test]
    fn commit_swaps_two_items() {
        let mut store = OccupancyStore::new(spec());
        store
            .insert_item(id(1), WidthClass::Normal, Placement::Slotted(SlotIndex(2)))
            .unwrap();
        store
            .insert_item(id(2), WidthClass::Normal, Placement::Slotted(SlotIndex(7)))
            .unwrap();
        store
            .commit(&[
                (id(1), Placement::Slotted(SlotIndex(7))),
                (id(2), Placement::Slotted(SlotIndex(2))),
            ])
            .unwrap();
        assert_eq!(store.occupant_at(SlotIndex(7)).unwrap(), Some(id(1)));
        assert_eq!(store.occupant_at(SlotIndex(2)).unwrap(), Some(id(2)));
    }

    #[test]
    fn failed_commit_leaves_state_unchanged() {
        let mut store = OccupancyStore::new(spec());
        store
            .insert_item(id(1), WidthClass::Normal, Placement::Slotted(SlotIndex(2)))
            .unwrap();
        store
            .insert_item(id(2), WidthClass::Normal, Placement::Slotted(SlotIndex(3)))
            .unwrap();
        let before = store.clone();

        let err = store
            .commit(&[(id(1), Placement::Slotted(SlotIndex(3)))])
            .unwrap_err();
        assert_eq!(
            err,
            OccupancyError::Overlap {
                slot: SlotIndex(3),
                first: id(2),
                second: id(1),
            }
        );
        assert_eq!(store, before);
    }

    #[test]
    fn commit_rejects_unknown_and_mismatched() {
        let mut store = OccupancyStore::new(spec());
        store
            .insert_item(id(1), WidthClass::Wide, Placement::SlottedWide(SlotIndex(0)))
            .unwrap();
        assert_eq!(
            store.commit(&[(id(9), Placement::Held)]),
            Err(OccupancyError::UnknownItem { item: id(9) })
        );
        assert_eq!(
            store.commit(&[(id(1), Placement::Slotted(SlotIndex(0)))]),
            Err(OccupancyError::WidthMismatch {
                item: id(1),
                width: WidthClass::Wide,
            })
        );
        assert_eq!(
            store.commit(&[(id(1), Placement::Held), (id(1), Placement::Held)]),
            Err(OccupancyError::DuplicateItem { item: id(1) })
        );
    }

    #[test]
    fn commit_allows_moving_within_own_footprint() {
        let mut store = OccupancyStore::new(spec());
        store
            .insert_item(id(1), WidthClass::Wide, Placement::SlottedWide(SlotIndex(2)))
            .unwrap();
        // Sliding one slot left overlaps the old footprint; the vacated
        // slots must be cleared before the new ones are checked.
        store
            .commit(&[(id(1), Placement::SlottedWide(SlotIndex(1)))])
            .unwrap();
        assert_eq!(store.occupant_at(SlotIndex(1)).unwrap(), Some(id(1)));
        assert_eq!(store.occupant_at(SlotIndex(2)).unwrap(), Some(id(1)));
        assert_eq!(store.occupant_at(SlotIndex(3)).unwrap(), None);
    }

    #[test]
    fn empty_commit_is_a_noop() {
        let mut store = OccupancyStore::new(spec());
        store
            .insert_item(id(1), WidthClass::Normal, Placement::Slotted(SlotIndex(0)))
            .unwrap();
        let before = store.clone();
        store.commit(&[]).unwrap();
        assert_eq!(store, before);
    }
}
