#![forbid(unsafe_code)]

//! Grid layer: authoritative occupancy state and drop planning.
//!
//! # Role in slotboard
//! `slotboard-grid` owns the placement relation between items and slots.
//! Everything the engine decides about a drop is computed here, as data,
//! before any state changes:
//!
//! - **OccupancyStore**: the slot→item map and its reverse index, mutated
//!   only through an atomic validate-then-apply [`commit`](occupancy::OccupancyStore::commit).
//! - **resolve_target**: the pure row-boundary/bounds correction that turns
//!   a raw candidate slot into the slot a drop will actually use.
//! - **plan_drop**: the displacement policy — swap, shift-right cascade,
//!   eviction to the holding area, or return-to-origin — expressed as a
//!   move list that feeds exactly one commit.
//! - **BoardSnapshot**: serde records of the full placement state for the
//!   view layer and test fixtures.
//!
//! # How it fits in the system
//! The runtime (`slotboard-runtime`) resolves a drop target on pointer-up,
//! asks this crate for a plan, and commits it. The view re-renders from
//! store state after each commit; no partial state is ever observable.

pub mod displace;
pub mod occupancy;
pub mod resolve;
pub mod snapshot;
