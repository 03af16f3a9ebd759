#![forbid(unsafe_code)]

//! Slotboard public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.
//!
//! The engine itself owns only grid state and placement decisions. A view
//! layer feeds it pointer events (plus a hit-test collaborator for
//! coordinate→slot resolution) and re-renders from the occupancy state
//! after each reaction.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use slotboard_core::event::{Modifiers, PointerEvent, PointerPhase, Position};
pub use slotboard_core::geometry::{GeometryError, GridSpec, SlotIndex};
pub use slotboard_core::item::{ItemId, Placement, WidthClass};

// --- Grid re-exports -------------------------------------------------------

pub use slotboard_grid::displace::{
    DropError, DropOutcome, DropPlan, DropTarget, SwapPolicy, plan_drop,
};
pub use slotboard_grid::occupancy::{OccupancyError, OccupancyStore};
pub use slotboard_grid::resolve::resolve_target;
pub use slotboard_grid::snapshot::{BOARD_SCHEMA_VERSION, BoardSnapshot, SnapshotError};

// --- Runtime re-exports ----------------------------------------------------

pub use slotboard_runtime::engine::{DragEngine, EngineReaction, HitTest};
pub use slotboard_runtime::session::{DragConfig, DragSession, Highlight, SessionState};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for slotboard apps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Grid shape or index error.
    Geometry(GeometryError),
    /// Occupancy state error (overlap, unknown item, bad shape).
    Occupancy(OccupancyError),
    /// Drop planning error (rejected swap).
    Drop(DropError),
    /// Snapshot validation or restore error.
    Snapshot(SnapshotError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(err) => write!(f, "{err}"),
            Self::Occupancy(err) => write!(f, "{err}"),
            Self::Drop(err) => write!(f, "{err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<GeometryError> for Error {
    fn from(err: GeometryError) -> Self {
        Self::Geometry(err)
    }
}

impl From<OccupancyError> for Error {
    fn from(err: OccupancyError) -> Self {
        Self::Occupancy(err)
    }
}

impl From<DropError> for Error {
    fn from(err: DropError) -> Self {
        Self::Drop(err)
    }
}

impl From<SnapshotError> for Error {
    fn from(err: SnapshotError) -> Self {
        Self::Snapshot(err)
    }
}

/// Standard result type for slotboard APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BoardSnapshot, DragConfig, DragEngine, DropOutcome, DropTarget, EngineReaction, Error,
        GridSpec, Highlight, HitTest, ItemId, OccupancyStore, Placement, PointerEvent,
        PointerPhase, Position, Result, SlotIndex, SwapPolicy, WidthClass,
    };

    pub use crate::{core, grid, runtime};
}

pub use slotboard_core as core;
pub use slotboard_grid as grid;
pub use slotboard_runtime as runtime;
