use glam::Vec2;

use super::types::{PointerId, MAX_POINTERS};

/// Position written to a slot whose pointer lifted while other pointers stay down.
pub const PARKED_POSITION: Vec2 = Vec2::new(0.0, 0.0);

/// Position written to a slot when the last pointer lifts (and the initial value).
pub const CLEARED_POSITION: Vec2 = Vec2::new(-1.0, -1.0);

/// Lifecycle of a single slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SlotPhase {
    /// A pointer is down and the position is live.
    Active,
    /// Pointer lifted while others remained; position is [`PARKED_POSITION`].
    Parked,
    /// No pointer remains; position is [`CLEARED_POSITION`].
    Cleared,
}

/// One entry of the fixed-size pointer table.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSlot {
    pub position: Vec2,
    pub phase: SlotPhase,
}

impl PointerSlot {
    pub const CLEARED: Self = Self {
        position: CLEARED_POSITION,
        phase: SlotPhase::Cleared,
    };

    pub const PARKED: Self = Self {
        position: PARKED_POSITION,
        phase: SlotPhase::Parked,
    };

    #[inline]
    pub const fn active(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            phase: SlotPhase::Active,
        }
    }

    /// Whether the render side should draw this slot.
    ///
    /// Decided by phase, never by position: a real touch may land on `(0, 0)`.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == SlotPhase::Active
    }
}

impl Default for PointerSlot {
    fn default() -> Self {
        Self::CLEARED
    }
}

/// Flattened view of one slot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pointer {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

/// Immutable copy of the whole pointer table.
///
/// This is the unit handed from the input context to the render context.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSnapshot {
    slots: [PointerSlot; MAX_POINTERS],
    sequence: u64,
}

impl PointerSnapshot {
    pub(crate) const fn new(slots: [PointerSlot; MAX_POINTERS], sequence: u64) -> Self {
        Self { slots, sequence }
    }

    /// Builds a snapshot from raw slots. Intended for tests and replay tooling.
    pub const fn from_slots(slots: [PointerSlot; MAX_POINTERS]) -> Self {
        Self::new(slots, 0)
    }

    #[inline]
    pub fn slots(&self) -> &[PointerSlot; MAX_POINTERS] {
        &self.slots
    }

    #[inline]
    pub fn slot(&self, id: PointerId) -> Option<&PointerSlot> {
        self.slots.get(id)
    }

    /// Number of input events applied before this snapshot was taken.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn pointers(&self) -> impl Iterator<Item = Pointer> + '_ {
        self.slots.iter().enumerate().map(|(id, s)| Pointer {
            id,
            x: s.position.x,
            y: s.position.y,
            active: s.is_active(),
        })
    }

    /// Active slots only, as `(id, screen position)`.
    pub fn active(&self) -> impl Iterator<Item = (PointerId, Vec2)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_active())
            .map(|(id, s)| (id, s.position))
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }
}

impl Default for PointerSnapshot {
    fn default() -> Self {
        Self::new([PointerSlot::CLEARED; MAX_POINTERS], 0)
    }
}
