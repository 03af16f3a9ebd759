//! The item model: identity, width class, and placement.
//!
//! Items are created by the external setup and outlive every drag; the
//! engine only relocates them. Width is an explicit tag on the item, never
//! derived from presentation state.
//!
//! # Invariants
//!
//! 1. An [`ItemId`] is non-zero and stable for the item's lifetime.
//! 2. A [`Placement::SlottedWide`] covers `start` and `start + 1`; whether
//!    those two slots share a row is the grid layer's concern (it validates
//!    against the [`GridSpec`](crate::geometry::GridSpec) on every commit).
//! 3. Every item has exactly one placement at all times; `Held` is a real
//!    placement, not the absence of one.

use std::fmt;
use std::num::NonZeroU64;

use crate::geometry::SlotIndex;

// ---------------------------------------------------------------------------
// ItemId
// ---------------------------------------------------------------------------

/// Stable identity of a draggable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(NonZeroU64);

impl ItemId {
    /// Create an item id. Returns `None` for the reserved value zero.
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// The raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// WidthClass
// ---------------------------------------------------------------------------

/// How many horizontally-adjacent cells an item occupies when slotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidthClass {
    /// One cell.
    Normal,
    /// Two cells in the same row.
    Wide,
}

impl WidthClass {
    /// Cell count for this width class.
    #[inline]
    #[must_use]
    pub const fn cells(self) -> u16 {
        match self {
            Self::Normal => 1,
            Self::Wide => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Where an item currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// A normal item occupying exactly one slot.
    Slotted(SlotIndex),

    /// A wide item occupying `start` and `start + 1` in the same row.
    SlottedWide(SlotIndex),

    /// In the unordered holding area (the dock), occupying no slot.
    Held,
}

impl Placement {
    /// Whether the item is in the holding area.
    #[inline]
    #[must_use]
    pub const fn is_held(&self) -> bool {
        matches!(self, Self::Held)
    }

    /// The first (or only) slot covered, if slotted.
    #[inline]
    #[must_use]
    pub const fn start(&self) -> Option<SlotIndex> {
        match self {
            Self::Slotted(s) | Self::SlottedWide(s) => Some(*s),
            Self::Held => None,
        }
    }

    /// Number of grid cells covered (zero when held).
    #[inline]
    #[must_use]
    pub const fn cells(&self) -> u16 {
        match self {
            Self::Slotted(_) => 1,
            Self::SlottedWide(_) => 2,
            Self::Held => 0,
        }
    }

    /// Iterate over the slots this placement covers.
    pub fn slots(self) -> impl Iterator<Item = SlotIndex> {
        let range = match self {
            Self::Slotted(s) => s.0..s.0.saturating_add(1),
            Self::SlottedWide(s) => s.0..s.0.saturating_add(2),
            Self::Held => 0..0,
        };
        range.map(SlotIndex)
    }

    /// Whether this placement covers `slot`.
    #[must_use]
    pub fn covers(&self, slot: SlotIndex) -> bool {
        self.slots().any(|s| s == slot)
    }

    /// Whether an item of `width` can adopt this placement shape.
    #[inline]
    #[must_use]
    pub const fn fits_width(&self, width: WidthClass) -> bool {
        match self {
            Self::Slotted(_) => matches!(width, WidthClass::Normal),
            Self::SlottedWide(_) => matches!(width, WidthClass::Wide),
            Self::Held => true,
        }
    }

    /// The slotted placement an item of `width` takes at `start`.
    #[inline]
    #[must_use]
    pub const fn for_width(width: WidthClass, start: SlotIndex) -> Self {
        match width {
            WidthClass::Normal => Self::Slotted(start),
            WidthClass::Wide => Self::SlottedWide(start),
        }
    }
}
