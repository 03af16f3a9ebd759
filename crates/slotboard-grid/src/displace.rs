//! Displacement planning: what happens to whatever already sits where an
//! item is dropped.
//!
//! [`plan_drop`] runs once per drop, at pointer-up. It never mutates the
//! store; it produces a [`DropPlan`] whose move list the caller feeds to a
//! single [`OccupancyStore::commit`]. Rules, in priority order:
//!
//! 1. Target slots empty → place directly; the grid origin (if any) frees.
//! 2. Target occupied, drag came from a grid slot → swap: occupants
//!    relocate into the vacated origin slots. An occupant whose width
//!    cannot fit follows the [`SwapPolicy`] — demoted to the holding area,
//!    or the whole drop is rejected.
//! 3. Target occupied, drag came from the holding area → the occupant
//!    chain shifts right toward the nearest free position (wide occupants
//!    skip starts that would span a row); occupants that run off the grid
//!    end are evicted to the holding area.
//! 4. Release over the holding area → the item becomes `Held`.
//! 5. Release outside grid and dock → no-op; the item keeps its origin.
//!
//! # Invariants
//!
//! 1. Planning reads the store but never writes it.
//! 2. A plan's moves, committed together, preserve no-overlap and
//!    conservation; the commit's own validation is the backstop.
//! 3. Exactly one commit per gesture, whatever the outcome.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::FxHashSet;
use slotboard_core::geometry::{GeometryError, GridSpec, SlotIndex};
use slotboard_core::item::{ItemId, Placement, WidthClass};

use crate::occupancy::OccupancyStore;
use crate::resolve::resolve_target;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What to do with a swap occupant whose width cannot fit the vacated slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapPolicy {
    /// Send the occupant to the holding area and let the swap proceed.
    #[default]
    DemoteToHolding,
    /// Fail the drop with [`DropError::IncompatibleSwap`]; the gesture
    /// becomes a no-op.
    Reject,
}

/// Where a drop landed, as reported by the view's hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Over a grid slot (the raw slot under the pointer, pre-resolution).
    Slot(SlotIndex),
    /// Over the holding area region.
    HoldingArea,
    /// Over neither.
    Outside,
}

/// Terminal outcome of a drop, for the view's animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The item landed on empty slots.
    Placed,
    /// The item traded places with the previous occupant(s).
    Swapped,
    /// Occupants shifted right to make room; `evicted` lists any that ran
    /// off the grid end into the holding area.
    Shifted { evicted: Vec<ItemId> },
    /// The item was dropped into the holding area.
    SentToHolding,
    /// Nothing changed; the item keeps its origin placement.
    ReturnedToOrigin,
}

/// The computed result of one drop: a move list for a single commit, plus
/// the outcome the view should animate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropPlan {
    pub moves: Vec<(ItemId, Placement)>,
    pub outcome: DropOutcome,
}

impl DropPlan {
    fn returned_to_origin() -> Self {
        Self {
            moves: Vec::new(),
            outcome: DropOutcome::ReturnedToOrigin,
        }
    }
}

/// Errors from drop planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropError {
    /// The dragged item (or a discovered occupant) is not registered.
    UnknownItem { item: ItemId },
    /// A swap occupant cannot fit the vacated slots and the policy is
    /// [`SwapPolicy::Reject`].
    IncompatibleSwap { occupant: ItemId },
    /// The candidate slot was out of range.
    Geometry(GeometryError),
}

impl fmt::Display for DropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownItem { item } => write!(f, "{item} is not registered"),
            Self::IncompatibleSwap { occupant } => {
                write!(f, "swap rejected: {occupant} does not fit the vacated slots")
            }
            Self::Geometry(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DropError {}

impl From<GeometryError> for DropError {
    fn from(err: GeometryError) -> Self {
        Self::Geometry(err)
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Compute the move list for dropping `item` on `target`.
///
/// Pure with respect to the store: the caller commits the returned plan's
/// moves (exactly once) to make it take effect.
pub fn plan_drop(
    store: &OccupancyStore,
    policy: SwapPolicy,
    item: ItemId,
    target: DropTarget,
) -> Result<DropPlan, DropError> {
    let width = store
        .width_of(item)
        .ok_or(DropError::UnknownItem { item })?;
    let origin = store
        .placement_of(item)
        .ok_or(DropError::UnknownItem { item })?;

    match target {
        DropTarget::Outside => Ok(DropPlan::returned_to_origin()),
        DropTarget::HoldingArea => Ok(DropPlan {
            moves: vec![(item, Placement::Held)],
            outcome: DropOutcome::SentToHolding,
        }),
        DropTarget::Slot(candidate) => {
            let start = resolve_target(store.spec(), candidate, width)?;
            let landing = Placement::for_width(width, start);
            let occupants = target_occupants(store, landing, item);

            if occupants.is_empty() {
                return Ok(DropPlan {
                    moves: vec![(item, landing)],
                    outcome: DropOutcome::Placed,
                });
            }
            match origin {
                Placement::Held => plan_shift(store, item, landing, &occupants),
                Placement::Slotted(_) | Placement::SlottedWide(_) => {
                    plan_swap(store, policy, item, origin, landing, &occupants)
                }
            }
        }
    }
}

/// Distinct occupants of the landing slots, in slot order, excluding the
/// dragged item itself.
fn target_occupants(store: &OccupancyStore, landing: Placement, dragged: ItemId) -> Vec<ItemId> {
    let mut out = Vec::new();
    for slot in landing.slots() {
        if let Some(occ) = store.occupant_raw(slot)
            && occ != dragged
            && !out.contains(&occ)
        {
            out.push(occ);
        }
    }
    out
}

/// Rule 2: the drag came from a grid slot, so occupants trade into the
/// slots the dragged item vacates.
fn plan_swap(
    store: &OccupancyStore,
    policy: SwapPolicy,
    item: ItemId,
    origin: Placement,
    landing: Placement,
    occupants: &[ItemId],
) -> Result<DropPlan, DropError> {
    let spec = store.spec();
    let mut moves = vec![(item, landing)];

    // Slots actually freed: the origin footprint minus whatever the new
    // placement retains (a one-slot slide keeps part of its own footprint).
    let mut vacated: Vec<SlotIndex> = origin.slots().filter(|s| !landing.covers(*s)).collect();

    for &occ in occupants {
        let occ_width = store
            .width_of(occ)
            .ok_or(DropError::UnknownItem { item: occ })?;
        match take_fit(spec, &mut vacated, occ_width) {
            Some(placement) => moves.push((occ, placement)),
            None => match policy {
                SwapPolicy::DemoteToHolding => moves.push((occ, Placement::Held)),
                SwapPolicy::Reject => {
                    return Err(DropError::IncompatibleSwap { occupant: occ });
                }
            },
        }
    }
    Ok(DropPlan {
        moves,
        outcome: DropOutcome::Swapped,
    })
}

/// Take the first position in `free` (sorted, ascending) that an item of
/// `width` can legally occupy, consuming the slots used.
fn take_fit(spec: GridSpec, free: &mut Vec<SlotIndex>, width: WidthClass) -> Option<Placement> {
    match width {
        WidthClass::Normal => {
            if free.is_empty() {
                None
            } else {
                Some(Placement::Slotted(free.remove(0)))
            }
        }
        WidthClass::Wide => {
            let pos = free.windows(2).position(|pair| {
                pair[1].get() == pair[0].get() + 1 && spec.row_of(pair[0]) == spec.row_of(pair[1])
            })?;
            let start = free[pos];
            free.drain(pos..=pos + 1);
            Some(Placement::SlottedWide(start))
        }
    }
}

/// Rule 3: the drag came from the holding area, so the occupant chain
/// shifts right. Each displaced occupant relocates to the first legal
/// position after its original start, pushing further occupants along;
/// one that finds no room before the grid end is evicted to the holding
/// area.
fn plan_shift(
    store: &OccupancyStore,
    item: ItemId,
    landing: Placement,
    occupants: &[ItemId],
) -> Result<DropPlan, DropError> {
    let spec = store.spec();
    let mut working: Vec<Option<ItemId>> = store.slots_raw().to_vec();
    let mut queue: VecDeque<(ItemId, SlotIndex)> = VecDeque::new();
    let mut finalized: FxHashSet<ItemId> = FxHashSet::default();
    let mut moves: Vec<(ItemId, Placement)> = Vec::new();
    let mut evicted: Vec<ItemId> = Vec::new();

    for &occ in occupants {
        displace(store, &mut working, &mut queue, occ)?;
    }
    for slot in landing.slots() {
        working[slot.get() as usize] = Some(item);
    }
    finalized.insert(item);
    moves.push((item, landing));

    while let Some((occ, orig_start)) = queue.pop_front() {
        let occ_width = store
            .width_of(occ)
            .ok_or(DropError::UnknownItem { item: occ })?;
        let cells = occ_width.cells();
        let mut start = orig_start.get() + 1;
        let mut placed = false;

        loop {
            if u32::from(start) + u32::from(cells) > u32::from(spec.slot_count()) {
                break; // no room anywhere to the right
            }
            // A wide pair may not start in the last column of a row.
            if cells == 2 && spec.is_row_boundary(SlotIndex(start)) {
                start += 1;
                continue;
            }
            let range = start..start + cells;

            // A slot already claimed in this plan blocks the position
            // entirely; keep scanning right.
            let blocked = range.clone().any(|s| {
                working[s as usize].is_some_and(|other| finalized.contains(&other))
            });
            if blocked {
                start += 1;
                continue;
            }

            // Push any remaining occupants of the range further down the
            // chain, then claim it.
            for s in range.clone() {
                if let Some(other) = working[s as usize]
                    && other != occ
                {
                    displace(store, &mut working, &mut queue, other)?;
                }
            }
            for s in range {
                working[s as usize] = Some(occ);
            }
            let placement = Placement::for_width(occ_width, SlotIndex(start));
            finalized.insert(occ);
            moves.push((occ, placement));
            placed = true;
            break;
        }

        if !placed {
            finalized.insert(occ);
            moves.push((occ, Placement::Held));
            evicted.push(occ);
        }
    }

    Ok(DropPlan {
        moves,
        outcome: DropOutcome::Shifted { evicted },
    })
}

/// Remove `occ` from the working slot map and queue it for relocation,
/// remembering the start it shifts from.
fn displace(
    store: &OccupancyStore,
    working: &mut [Option<ItemId>],
    queue: &mut VecDeque<(ItemId, SlotIndex)>,
    occ: ItemId,
) -> Result<(), DropError> {
    // An item found in the slot map is always slotted; the store's
    // consistency invariant guarantees the index knows it.
    let placement = store
        .placement_of(occ)
        .ok_or(DropError::UnknownItem { item: occ })?;
    let Some(start) = placement.start() else {
        return Err(DropError::UnknownItem { item: occ });
    };
    for slot in placement.slots() {
        working[slot.get() as usize] = None;
    }
    queue.push_back((occ, start));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotboard_core::geometry::GridSpec;

    fn spec() -> GridSpec {
        GridSpec::new(5, 10).unwrap()
    }

    fn id(raw: u64) -> ItemId {
        ItemId::new(raw).unwrap()
    }

    fn store_with(entries: &[(u64, WidthClass, Placement)]) -> OccupancyStore {
        let mut store = OccupancyStore::new(spec());
        for &(raw, width, placement) in entries {
            store.insert_item(id(raw), width, placement).unwrap();
        }
        store
    }

    fn apply(store: &mut OccupancyStore, plan: &DropPlan) {
        store.commit(&plan.moves).unwrap();
    }

    #[test]
    fn drop_on_empty_slots_places() {
        let mut store = store_with(&[(1, WidthClass::Normal, Placement::Slotted(SlotIndex(0)))]);
        let plan = plan_drop(
            &store,
            SwapPolicy::default(),
            id(1),
            DropTarget::Slot(SlotIndex(7)),
        )
        .unwrap();
        assert_eq!(plan.outcome, DropOutcome::Placed);
        apply(&mut store, &plan);
        assert_eq!(store.placement_of(id(1)), Some(Placement::Slotted(SlotIndex(7))));
        assert_eq!(store.occupant_at(SlotIndex(0)).unwrap(), None);
    }

    #[test]
    fn normal_items_swap() {
        // Item 2 dropped on item 1's slot 2: afterwards 1 sits in 2's
        // origin and 2 sits in slot 2.
        let mut store = store_with(&[
            (1, WidthClass::Normal, Placement::Slotted(SlotIndex(2))),
            (2, WidthClass::Normal, Placement::Slotted(SlotIndex(6))),
        ]);
        let plan = plan_drop(
            &store,
            SwapPolicy::default(),
            id(2),
            DropTarget::Slot(SlotIndex(2)),
        )
        .unwrap();
        assert_eq!(plan.outcome, DropOutcome::Swapped);
        apply(&mut store, &plan);
        assert_eq!(store.placement_of(id(2)), Some(Placement::Slotted(SlotIndex(2))));
        assert_eq!(store.placement_of(id(1)), Some(Placement::Slotted(SlotIndex(6))));
    }

    #[test]
    fn wide_occupant_demoted_when_origin_is_single_slot() {
        let mut store = store_with(&[
            (1, WidthClass::Wide, Placement::SlottedWide(SlotIndex(5))),
            (2, WidthClass::Normal, Placement::Slotted(SlotIndex(0))),
        ]);
        // Normal item 2 drops onto the wide item's footprint; the wide
        // occupant cannot fit the vacated single slot 0.
        let plan = plan_drop(
            &store,
            SwapPolicy::DemoteToHolding,
            id(2),
            DropTarget::Slot(SlotIndex(5)),
        )
        .unwrap();
        assert_eq!(plan.outcome, DropOutcome::Swapped);
        apply(&mut store, &plan);
        assert_eq!(store.placement_of(id(2)), Some(Placement::Slotted(SlotIndex(5))));
        assert_eq!(store.placement_of(id(1)), Some(Placement::Held));
        // Slot 6 (the wide item's second cell) is freed.
        assert_eq!(store.occupant_at(SlotIndex(6)).unwrap(), None);
    }

    #[test]
    fn reject_policy_fails_incompatible_swap() {
        let store = store_with(&[
            (1, WidthClass::Wide, Placement::SlottedWide(SlotIndex(5))),
            (2, WidthClass::Normal, Placement::Slotted(SlotIndex(0))),
        ]);
        let err = plan_drop(
            &store,
            SwapPolicy::Reject,
            id(2),
            DropTarget::Slot(SlotIndex(5)),
        )
        .unwrap_err();
        assert_eq!(err, DropError::IncompatibleSwap { occupant: id(1) });
    }

    #[test]
    fn wide_drop_swaps_two_normal_occupants_into_its_pair() {
        let mut store = store_with(&[
            (1, WidthClass::Wide, Placement::SlottedWide(SlotIndex(0))),
            (2, WidthClass::Normal, Placement::Slotted(SlotIndex(5))),
            (3, WidthClass::Normal, Placement::Slotted(SlotIndex(6))),
        ]);
        let plan = plan_drop(
            &store,
            SwapPolicy::default(),
            id(1),
            DropTarget::Slot(SlotIndex(5)),
        )
        .unwrap();
        assert_eq!(plan.outcome, DropOutcome::Swapped);
        apply(&mut store, &plan);
        assert_eq!(
            store.placement_of(id(1)),
            Some(Placement::SlottedWide(SlotIndex(5)))
        );
        assert_eq!(store.placement_of(id(2)), Some(Placement::Slotted(SlotIndex(0))));
        assert_eq!(store.placement_of(id(3)), Some(Placement::Slotted(SlotIndex(1))));
    }

    #[test]
    fn dock_drop_shifts_occupant_right() {
        let mut store = store_with(&[
            (1, WidthClass::Normal, Placement::Slotted(SlotIndex(3))),
            (2, WidthClass::Wide, Placement::Held),
        ]);
        // Wide item from the dock lands on 3–4 (candidate 4 resolves to 3);
        // the occupant of slot 3 shifts right past the claimed pair.
        let plan = plan_drop(
            &store,
            SwapPolicy::default(),
            id(2),
            DropTarget::Slot(SlotIndex(4)),
        )
        .unwrap();
        assert_eq!(plan.outcome, DropOutcome::Shifted { evicted: vec![] });
        apply(&mut store, &plan);
        assert_eq!(
            store.placement_of(id(2)),
            Some(Placement::SlottedWide(SlotIndex(3)))
        );
        assert_eq!(store.placement_of(id(1)), Some(Placement::Slotted(SlotIndex(5))));
    }

    #[test]
    fn dock_drop_cascades_a_dense_chain() {
        let mut store = store_with(&[
            (1, WidthClass::Normal, Placement::Slotted(SlotIndex(6))),
            (2, WidthClass::Normal, Placement::Slotted(SlotIndex(7))),
            (3, WidthClass::Normal, Placement::Slotted(SlotIndex(8))),
            (4, WidthClass::Normal, Placement::Held),
        ]);
        // Every occupant in the dense run 6–8 shifts exactly one right.
        let plan = plan_drop(
            &store,
            SwapPolicy::default(),
            id(4),
            DropTarget::Slot(SlotIndex(6)),
        )
        .unwrap();
        assert_eq!(plan.outcome, DropOutcome::Shifted { evicted: vec![] });
        apply(&mut store, &plan);
        assert_eq!(store.placement_of(id(4)), Some(Placement::Slotted(SlotIndex(6))));
        assert_eq!(store.placement_of(id(1)), Some(Placement::Slotted(SlotIndex(7))));
        assert_eq!(store.placement_of(id(2)), Some(Placement::Slotted(SlotIndex(8))));
        assert_eq!(store.placement_of(id(3)), Some(Placement::Slotted(SlotIndex(9))));
    }

    #[test]
    fn dock_drop_evicts_when_the_row_end_is_full() {
        let mut store = store_with(&[
            (1, WidthClass::Normal, Placement::Slotted(SlotIndex(8))),
            (2, WidthClass::Normal, Placement::Slotted(SlotIndex(9))),
            (3, WidthClass::Normal, Placement::Held),
        ]);
        // Dropping on slot 8: item 1 shifts to 9, pushing item 2 off the
        // grid end into the holding area.
        let plan = plan_drop(
            &store,
            SwapPolicy::default(),
            id(3),
            DropTarget::Slot(SlotIndex(8)),
        )
        .unwrap();
        assert_eq!(
            plan.outcome,
            DropOutcome::Shifted {
                evicted: vec![id(2)]
            }
        );
        apply(&mut store, &plan);
        assert_eq!(store.placement_of(id(3)), Some(Placement::Slotted(SlotIndex(8))));
        assert_eq!(store.placement_of(id(1)), Some(Placement::Slotted(SlotIndex(9))));
        assert_eq!(store.placement_of(id(2)), Some(Placement::Held));
    }

    #[test]
    fn shifted_wide_occupant_moves_one_right() {
        let mut store = store_with(&[
            (1, WidthClass::Wide, Placement::SlottedWide(SlotIndex(2))),
            (2, WidthClass::Normal, Placement::Held),
        ]);
        // Normal item lands on slot 2; one shift frees it, moving the wide
        // occupant from 2-3 to 3-4 (still within the first row).
        let plan = plan_drop(
            &store,
            SwapPolicy::default(),
            id(2),
            DropTarget::Slot(SlotIndex(2)),
        )
        .unwrap();
        apply(&mut store, &plan);
        assert_eq!(store.placement_of(id(2)), Some(Placement::Slotted(SlotIndex(2))));
        assert_eq!(
            store.placement_of(id(1)),
            Some(Placement::SlottedWide(SlotIndex(3)))
        );
    }

    #[test]
    fn shifted_wide_occupant_wraps_to_next_row_when_boundary_blocks() {
        let mut store = store_with(&[
            (1, WidthClass::Wide, Placement::SlottedWide(SlotIndex(3))),
            (2, WidthClass::Wide, Placement::Held),
        ]);
        // The dock item claims 3–4; the displaced wide occupant cannot
        // start at 4 (row boundary) so it wraps to the next row's start.
        let plan = plan_drop(
            &store,
            SwapPolicy::default(),
            id(2),
            DropTarget::Slot(SlotIndex(3)),
        )
        .unwrap();
        apply(&mut store, &plan);
        assert_eq!(
            store.placement_of(id(2)),
            Some(Placement::SlottedWide(SlotIndex(3)))
        );
        assert_eq!(
            store.placement_of(id(1)),
            Some(Placement::SlottedWide(SlotIndex(5)))
        );
    }

    #[test]
    fn drop_over_holding_area_holds_the_item() {
        let mut store = store_with(&[(1, WidthClass::Wide, Placement::SlottedWide(SlotIndex(0)))]);
        let plan =
            plan_drop(&store, SwapPolicy::default(), id(1), DropTarget::HoldingArea).unwrap();
        assert_eq!(plan.outcome, DropOutcome::SentToHolding);
        apply(&mut store, &plan);
        assert_eq!(store.placement_of(id(1)), Some(Placement::Held));
        assert_eq!(store.occupant_at(SlotIndex(0)).unwrap(), None);
    }

    #[test]
    fn drop_outside_returns_to_origin() {
        let mut store = store_with(&[(1, WidthClass::Normal, Placement::Slotted(SlotIndex(5)))]);
        let before = store.clone();
        let plan = plan_drop(&store, SwapPolicy::default(), id(1), DropTarget::Outside).unwrap();
        assert_eq!(plan.outcome, DropOutcome::ReturnedToOrigin);
        assert!(plan.moves.is_empty());
        apply(&mut store, &plan);
        assert_eq!(store, before);
    }

    #[test]
    fn wide_sliding_one_slot_swaps_partial_overlap() {
        let mut store = store_with(&[
            (1, WidthClass::Wide, Placement::SlottedWide(SlotIndex(0))),
            (2, WidthClass::Normal, Placement::Slotted(SlotIndex(2))),
        ]);
        // The wide item slides from 0–1 to 1–2. Only slot 0 is actually
        // vacated, and the displaced normal occupant takes it.
        let plan = plan_drop(
            &store,
            SwapPolicy::default(),
            id(1),
            DropTarget::Slot(SlotIndex(1)),
        )
        .unwrap();
        assert_eq!(plan.outcome, DropOutcome::Swapped);
        apply(&mut store, &plan);
        assert_eq!(
            store.placement_of(id(1)),
            Some(Placement::SlottedWide(SlotIndex(1)))
        );
        assert_eq!(store.placement_of(id(2)), Some(Placement::Slotted(SlotIndex(0))));
    }

    #[test]
    fn unknown_item_rejected() {
        let store = store_with(&[]);
        assert_eq!(
            plan_drop(&store, SwapPolicy::default(), id(1), DropTarget::Outside),
            Err(DropError::UnknownItem { item: id(1) })
        );
    }
}
