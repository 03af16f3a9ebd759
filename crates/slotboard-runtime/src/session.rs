//! The drag session: state for one gesture, pointer-down to release.
//!
//! A [`DragSession`] is constructed on pointer-down and consumed on
//! pointer-up or cancel; it is never shared across gestures. While the
//! session exists the board is untouched — tracking only recomputes the
//! live preview highlight, and the single commit happens at release.
//!
//! # State Machine
//!
//! `Armed` → `Dragging` → consumed. A session arms when the pointer goes
//! down on an item; it starts dragging once the pointer travels past the
//! configured Manhattan-distance threshold (default 0, the first move).
//! A session that never starts dragging ends as a click with no mutation.
//!
//! # Invariants
//!
//! 1. At most one highlight at a time; each recomputation supersedes the
//!    previous one entirely.
//! 2. Tracking never mutates occupancy state.
//! 3. The origin placement captured at arm time is the restore point for
//!    every failure path.

use slotboard_core::event::Position;
use slotboard_core::geometry::{GridSpec, SlotIndex};
use slotboard_core::item::{ItemId, Placement, WidthClass};
use slotboard_grid::resolve::resolve_target;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Gesture thresholds.
#[derive(Debug, Clone)]
pub struct DragConfig {
    /// Minimum Manhattan distance (pixels) from the press position before
    /// an armed session starts dragging (default: 0.0, the first move).
    pub drag_threshold: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Highlight
// ---------------------------------------------------------------------------

/// The live drop preview: the resolved slot, or slot pair for wide items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    /// Resolved start slot.
    pub start: SlotIndex,
    /// Last covered slot (`start` itself for normal items).
    pub end: SlotIndex,
}

impl Highlight {
    /// The highlight an item of `width` shows at resolved `start`.
    #[must_use]
    pub const fn of(width: WidthClass, start: SlotIndex) -> Self {
        match width {
            WidthClass::Normal => Self { start, end: start },
            WidthClass::Wide => Self {
                start,
                end: SlotIndex(start.get() + 1),
            },
        }
    }

    /// Iterate over the highlighted slots.
    pub fn slots(self) -> impl Iterator<Item = SlotIndex> {
        (self.start.get()..=self.end.get()).map(SlotIndex)
    }
}

// ---------------------------------------------------------------------------
// DragSession
// ---------------------------------------------------------------------------

/// Lifecycle stage of a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Pointer is down on the item; movement hasn't crossed the threshold.
    Armed,
    /// Live tracking; a highlight may be showing.
    Dragging,
}

/// State for one drag gesture.
#[derive(Debug, Clone)]
pub struct DragSession {
    item: ItemId,
    width: WidthClass,
    origin: Placement,
    pressed_at: Position,
    grab_offset: Position,
    state: SessionState,
    highlight: Option<Highlight>,
}

impl DragSession {
    pub(crate) fn new(
        item: ItemId,
        width: WidthClass,
        origin: Placement,
        pressed_at: Position,
        grab_offset: Position,
    ) -> Self {
        Self {
            item,
            width,
            origin,
            pressed_at,
            grab_offset,
            state: SessionState::Armed,
            highlight: None,
        }
    }

    /// The item being dragged.
    #[inline]
    #[must_use]
    pub fn item(&self) -> ItemId {
        self.item
    }

    /// The dragged item's width class.
    #[inline]
    #[must_use]
    pub fn width(&self) -> WidthClass {
        self.width
    }

    /// The placement captured at pointer-down; the restore point.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Placement {
        self.origin
    }

    /// Pointer offset within the item's visual bounds at pointer-down,
    /// carried for the view's ghost positioning.
    #[inline]
    #[must_use]
    pub fn grab_offset(&self) -> Position {
        self.grab_offset
    }

    /// Current lifecycle stage.
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The current preview highlight, if the pointer is over the grid.
    #[inline]
    #[must_use]
    pub fn highlight(&self) -> Option<Highlight> {
        self.highlight
    }

    /// Whether the session has crossed the drag threshold.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SessionState::Dragging)
    }

    /// Advance on a pointer move. `slot_under` is the raw slot under the
    /// pointer per the view's hit test. Returns `true` when the highlight
    /// changed and the view should re-render the preview.
    pub(crate) fn track(
        &mut self,
        spec: GridSpec,
        position: Position,
        threshold: f32,
        slot_under: Option<SlotIndex>,
    ) -> bool {
        if self.state == SessionState::Armed {
            if position.manhattan_distance(self.pressed_at) < threshold {
                return false;
            }
            self.state = SessionState::Dragging;
        }

        // Resolution is pure; an out-of-range candidate from the hit test
        // is dropped rather than shown.
        let next = slot_under
            .and_then(|candidate| resolve_target(spec, candidate, self.width).ok())
            .map(|start| Highlight::of(self.width, start));

        if next != self.highlight {
            self.highlight = next;
            true
        } else {
            false
        }
    }
}
