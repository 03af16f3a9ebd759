//! Canonical pointer input types.
//!
//! The engine is fed a stream of [`PointerEvent`]s by an external input
//! source (the thing that actually captures pointer input). Coordinates are
//! screen-space pixels; translating a coordinate to a slot or an item is the
//! view's job, via the hit-test collaborator in `slotboard-runtime`.
//!
//! # Design Notes
//!
//! - Positions are 0-indexed screen pixels, `f32` because input devices
//!   report fractional coordinates.
//! - `Modifiers` use bitflags for easy combination; the engine itself does
//!   not interpret them, but carries them so a view can (e.g. ctrl-drag).

use bitflags::bitflags;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A 2D screen-space position (0-indexed pixels, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position.
    #[must_use]
    pub fn manhattan_distance(self, other: Self) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

// ---------------------------------------------------------------------------
// PointerEvent
// ---------------------------------------------------------------------------

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Pointer made contact (mouse button down, touch start).
    Down,

    /// Pointer moved while in contact.
    Move,

    /// Pointer released normally.
    Up,

    /// Gesture was interrupted (capture lost, touch cancelled).
    Cancel,
}

/// A pointer input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub phase: PointerPhase,

    /// Where it happened, in screen pixels.
    pub position: Position,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a pointer event with default modifiers.
    #[must_use]
    pub const fn new(phase: PointerPhase, position: Position) -> Self {
        Self {
            phase,
            position,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a pointer event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// A `Down` event at `position`.
    #[must_use]
    pub const fn down(position: Position) -> Self {
        Self::new(PointerPhase::Down, position)
    }

    /// A `Move` event at `position`.
    #[must_use]
    pub const fn moved(position: Position) -> Self {
        Self::new(PointerPhase::Move, position)
    }

    /// An `Up` event at `position`.
    #[must_use]
    pub const fn up(position: Position) -> Self {
        Self::new(PointerPhase::Up, position)
    }

    /// A `Cancel` event at `position`.
    #[must_use]
    pub const fn cancel(position: Position) -> Self {
        Self::new(PointerPhase::Cancel, position)
    }
}
