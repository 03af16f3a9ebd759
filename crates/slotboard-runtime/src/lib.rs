#![forbid(unsafe_code)]

//! Runtime: one drag gesture end-to-end.
//!
//! # Role in slotboard
//! `slotboard-runtime` turns the pointer event stream into committed board
//! mutations. It owns the at-most-one live [`DragSession`](session::DragSession)
//! and the [`DragEngine`](engine::DragEngine) facade the view talks to.
//!
//! # Primary responsibilities
//! - **DragSession**: Armed → Dragging state machine for a single gesture,
//!   with origin capture and live highlight tracking.
//! - **DragEngine**: consumes [`PointerEvent`](slotboard_core::event::PointerEvent)s,
//!   queries the view-owned [`HitTest`](engine::HitTest) collaborator, and
//!   returns [`EngineReaction`](engine::EngineReaction)s for re-rendering.
//!
//! # Concurrency model
//! Single-threaded and event-driven: every operation runs to completion in
//! response to one input event. Only one session can be live, so commits
//! never interleave; cancellation is synchronous and always restores the
//! pre-drag state.

pub mod engine;
pub mod session;
