#![forbid(unsafe_code)]

//! Core: pointer events, grid geometry, and the item model.
//!
//! # Role in slotboard
//! `slotboard-core` is the vocabulary layer. It owns the normalized pointer
//! event types the runtime consumes, the grid topology math every other
//! component delegates to, and the item/placement data model.
//!
//! # Primary responsibilities
//! - **PointerEvent**: canonical pointer input (down, move, up, cancel).
//! - **GridSpec**: linear-index ↔ (row, column) mapping and row-boundary
//!   decisions for a fixed column count.
//! - **Item model**: stable item identity, explicit width class, and the
//!   placement relation (slotted, wide-slotted, or held in the dock).
//!
//! # How it fits in the system
//! The grid layer (`slotboard-grid`) stores placements keyed by these types
//! and the runtime (`slotboard-runtime`) drives drag gestures from
//! `PointerEvent` values. Nothing here mutates state; every type is a small
//! value with pure operations.

pub mod event;
pub mod geometry;
pub mod item;
