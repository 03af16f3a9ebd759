//! Board snapshot schema v1: serde records of the full placement state.
//!
//! A [`BoardSnapshot`] is the interchange value the view layer re-renders
//! from and the fixture format for tests. It is an in-memory contract, not
//! session persistence — the engine never reads or writes files.
//!
//! # Schema Versioning Policy
//!
//! - Snapshots carry their schema version; loaders reject unknown versions
//!   with an actionable error.
//! - Entries are sorted by item id, so equal states serialize identically.

use std::fmt;

use serde::{Deserialize, Serialize};
use slotboard_core::geometry::{GeometryError, GridSpec, SlotIndex};
use slotboard_core::item::{ItemId, Placement, WidthClass};

use crate::occupancy::{OccupancyError, OccupancyStore};

/// Current board snapshot schema version.
pub const BOARD_SCHEMA_VERSION: u16 = 1;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Width class record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthRecord {
    Normal,
    Wide,
}

impl From<WidthClass> for WidthRecord {
    fn from(width: WidthClass) -> Self {
        match width {
            WidthClass::Normal => Self::Normal,
            WidthClass::Wide => Self::Wide,
        }
    }
}

impl From<WidthRecord> for WidthClass {
    fn from(record: WidthRecord) -> Self {
        match record {
            WidthRecord::Normal => Self::Normal,
            WidthRecord::Wide => Self::Wide,
        }
    }
}

/// Placement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementRecord {
    Slotted(u16),
    SlottedWide(u16),
    Held,
}

impl From<Placement> for PlacementRecord {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Slotted(s) => Self::Slotted(s.get()),
            Placement::SlottedWide(s) => Self::SlottedWide(s.get()),
            Placement::Held => Self::Held,
        }
    }
}

impl From<PlacementRecord> for Placement {
    fn from(record: PlacementRecord) -> Self {
        match record {
            PlacementRecord::Slotted(s) => Self::Slotted(SlotIndex(s)),
            PlacementRecord::SlottedWide(s) => Self::SlottedWide(SlotIndex(s)),
            PlacementRecord::Held => Self::Held,
        }
    }
}

/// One item's state in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub item: u64,
    pub width: WidthRecord,
    pub placement: PlacementRecord,
}

/// Full placement state of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Schema version for migration detection.
    #[serde(default = "default_board_version")]
    pub schema_version: u16,
    /// Grid shape the placements are relative to.
    pub columns: u16,
    pub slot_count: u16,
    /// Every registered item, sorted by id.
    pub entries: Vec<SnapshotEntry>,
}

fn default_board_version() -> u16 {
    BOARD_SCHEMA_VERSION
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from snapshot validation and restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    /// Snapshot carries a schema version this build does not understand.
    UnsupportedVersion { found: u16, expected: u16 },
    /// The recorded grid shape is invalid.
    InvalidShape(GeometryError),
    /// An entry uses the reserved zero item id.
    ZeroItemId,
    /// The recorded placements are not a legal board state.
    Occupancy(OccupancyError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => {
                write!(f, "unsupported board schema version {found} (expected {expected})")
            }
            Self::InvalidShape(err) => write!(f, "{err}"),
            Self::ZeroItemId => write!(f, "snapshot entry uses reserved item id 0"),
            Self::Occupancy(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

impl BoardSnapshot {
    /// Validate without building a store: version, shape, and placements.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        self.to_store().map(|_| ())
    }

    /// Build a live store from this snapshot.
    pub fn to_store(&self) -> Result<OccupancyStore, SnapshotError> {
        if self.schema_version != BOARD_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.schema_version,
                expected: BOARD_SCHEMA_VERSION,
            });
        }
        let spec =
            GridSpec::new(self.columns, self.slot_count).map_err(SnapshotError::InvalidShape)?;
        let mut store = OccupancyStore::new(spec);
        for entry in &self.entries {
            let item = ItemId::new(entry.item).ok_or(SnapshotError::ZeroItemId)?;
            store
                .insert_item(item, entry.width.into(), entry.placement.into())
                .map_err(SnapshotError::Occupancy)?;
        }
        Ok(store)
    }
}

impl OccupancyStore {
    /// Capture the current placement state as a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut entries: Vec<SnapshotEntry> = self
            .items()
            .map(|(item, width, placement)| SnapshotEntry {
                item: item.get(),
                width: width.into(),
                placement: placement.into(),
            })
            .collect();
        entries.sort_by_key(|e| e.item);
        BoardSnapshot {
            schema_version: BOARD_SCHEMA_VERSION,
            columns: self.spec().columns(),
            slot_count: self.spec().slot_count(),
            entries,
        }
    }
}
