//! The drag engine: pointer events in, board mutations and reactions out.
//!
//! [`DragEngine`] owns the occupancy store and the at-most-one live
//! [`DragSession`]. The view feeds it every [`PointerEvent`] and renders
//! from the reactions; "what is visually under this coordinate" stays on
//! the view side behind the [`HitTest`] trait, since it depends on
//! rendering.
//!
//! # Failure Modes
//!
//! - A commit rejected by the store (overlap) cancels the gesture: the item
//!   keeps its origin placement and the view sees `ReturnedToOrigin`.
//! - A swap rejected by [`SwapPolicy::Reject`] behaves the same way.
//! - A hit test reporting an unregistered item is logged and ignored.
//!
//! No failure is fatal; the user-visible worst case is a drop that silently
//! does nothing and an item that snaps back.

use slotboard_core::event::{PointerEvent, PointerPhase, Position};
use slotboard_core::geometry::SlotIndex;
use slotboard_core::item::ItemId;
use slotboard_grid::displace::{DropError, DropOutcome, DropTarget, SwapPolicy, plan_drop};
use slotboard_grid::occupancy::OccupancyStore;
use slotboard_grid::snapshot::BoardSnapshot;

use crate::session::{DragConfig, DragSession, Highlight};

// ---------------------------------------------------------------------------
// HitTest
// ---------------------------------------------------------------------------

/// View-owned coordinate resolution.
///
/// The engine never knows pixel geometry; the view answers "what is under
/// this coordinate" from its own layout.
pub trait HitTest {
    /// The item visually under `position`, if any.
    fn item_at(&self, position: Position) -> Option<ItemId>;

    /// The raw grid slot under `position`, if any (pre-resolution).
    fn slot_at(&self, position: Position) -> Option<SlotIndex>;

    /// Whether `position` is inside the holding-area region.
    fn over_holding_area(&self, position: Position) -> bool;

    /// Top-left of the item's visual bounds, for grab-offset capture.
    /// Views that don't animate a ghost can leave the default.
    fn item_top_left(&self, item: ItemId) -> Option<Position> {
        let _ = item;
        None
    }
}

// ---------------------------------------------------------------------------
// Reactions
// ---------------------------------------------------------------------------

/// What the view should do after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineReaction {
    /// Nothing to re-render.
    None,

    /// A gesture armed on `item` (pointer went down on it).
    Armed { item: ItemId },

    /// The live drop preview changed; `None` clears it.
    HighlightChanged(Option<Highlight>),

    /// A drop finished and the store reflects the outcome; re-render.
    Dropped { item: ItemId, outcome: DropOutcome },

    /// The gesture was cancelled; the origin placement still holds.
    Cancelled { item: ItemId },
}

// ---------------------------------------------------------------------------
// DragEngine
// ---------------------------------------------------------------------------

/// The placement engine facade.
#[derive(Debug)]
pub struct DragEngine {
    store: OccupancyStore,
    swap_policy: SwapPolicy,
    config: DragConfig,
    session: Option<DragSession>,
}

impl DragEngine {
    /// Create an engine over a populated store, with default policy and
    /// gesture configuration.
    #[must_use]
    pub fn new(store: OccupancyStore) -> Self {
        Self {
            store,
            swap_policy: SwapPolicy::default(),
            config: DragConfig::default(),
            session: None,
        }
    }

    /// Select the swap policy for width-incompatible occupants.
    #[must_use]
    pub fn with_swap_policy(mut self, policy: SwapPolicy) -> Self {
        self.swap_policy = policy;
        self
    }

    /// Override gesture thresholds.
    #[must_use]
    pub fn with_config(mut self, config: DragConfig) -> Self {
        self.config = config;
        self
    }

    /// The authoritative board state, for re-rendering.
    #[inline]
    #[must_use]
    pub fn store(&self) -> &OccupancyStore {
        &self.store
    }

    /// Snapshot of the board state.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        self.store.snapshot()
    }

    /// The live session, if a gesture is in progress.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// The current preview highlight.
    #[must_use]
    pub fn highlight(&self) -> Option<Highlight> {
        self.session.as_ref().and_then(DragSession::highlight)
    }

    /// Whether a gesture has crossed the drag threshold.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(DragSession::is_dragging)
    }

    /// Feed one pointer event through the engine.
    pub fn handle_event(&mut self, event: &PointerEvent, hit: &dyn HitTest) -> EngineReaction {
        match event.phase {
            PointerPhase::Down => self.on_down(event.position, hit),
            PointerPhase::Move => self.on_move(event.position, hit),
            PointerPhase::Up => self.on_up(event.position, hit),
            PointerPhase::Cancel => self.cancel(),
        }
    }

    /// Cancel any live gesture, restoring the pre-drag state.
    ///
    /// The board was never mutated during tracking, so restoring means
    /// discarding the session and its highlight.
    pub fn cancel(&mut self) -> EngineReaction {
        match self.session.take() {
            Some(session) => {
                tracing::debug!(item = %session.item(), "gesture cancelled");
                EngineReaction::Cancelled {
                    item: session.item(),
                }
            }
            None => EngineReaction::None,
        }
    }

    fn on_down(&mut self, position: Position, hit: &dyn HitTest) -> EngineReaction {
        if self.session.is_some() {
            // Never straddle two gestures: force-cancel the live one and
            // swallow the triggering event.
            return self.cancel();
        }
        let Some(item) = hit.item_at(position) else {
            return EngineReaction::None;
        };
        let (Some(width), Some(origin)) =
            (self.store.width_of(item), self.store.placement_of(item))
        else {
            tracing::warn!(%item, "hit test reported an unregistered item");
            return EngineReaction::None;
        };
        let grab_offset = hit
            .item_top_left(item)
            .map(|tl| Position::new(position.x - tl.x, position.y - tl.y))
            .unwrap_or_default();

        tracing::debug!(%item, ?origin, "drag armed");
        self.session = Some(DragSession::new(item, width, origin, position, grab_offset));
        EngineReaction::Armed { item }
    }

    fn on_move(&mut self, position: Position, hit: &dyn HitTest) -> EngineReaction {
        let spec = self.store.spec();
        let threshold = self.config.drag_threshold;
        let slot_under = hit.slot_at(position);
        let Some(session) = self.session.as_mut() else {
            return EngineReaction::None;
        };
        if session.track(spec, position, threshold, slot_under) {
            EngineReaction::HighlightChanged(session.highlight())
        } else {
            EngineReaction::None
        }
    }

    fn on_up(&mut self, position: Position, hit: &dyn HitTest) -> EngineReaction {
        let Some(session) = self.session.take() else {
            return EngineReaction::None;
        };
        if !session.is_dragging() {
            // The pointer never crossed the threshold: a click, not a drag.
            return EngineReaction::None;
        }
        let item = session.item();

        let target = if let Some(slot) = hit.slot_at(position) {
            DropTarget::Slot(slot)
        } else if hit.over_holding_area(position) {
            DropTarget::HoldingArea
        } else {
            DropTarget::Outside
        };

        let outcome = match plan_drop(&self.store, self.swap_policy, item, target) {
            Ok(plan) => match self.store.commit(&plan.moves) {
                Ok(()) => plan.outcome,
                Err(err) => {
                    tracing::warn!(%item, %err, "commit rejected; gesture cancelled");
                    DropOutcome::ReturnedToOrigin
                }
            },
            Err(DropError::IncompatibleSwap { occupant }) => {
                tracing::debug!(%item, %occupant, "swap rejected by policy");
                DropOutcome::ReturnedToOrigin
            }
            Err(err) => {
                tracing::warn!(%item, %err, "drop planning failed");
                DropOutcome::ReturnedToOrigin
            }
        };

        tracing::debug!(%item, ?outcome, "drop finished");
        EngineReaction::Dropped { item, outcome }
    }
}
