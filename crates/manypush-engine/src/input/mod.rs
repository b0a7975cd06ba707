//! Input subsystem.
//!
//! Public API is platform-agnostic. Runtime code translates platform events into
//! [`TouchEvent`]s (see [`platform`]) and feeds them to a [`PointerTracker`], whose
//! snapshots are the only thing that crosses to the render context.

mod error;
pub mod platform;
mod snapshot;
mod tracker;
mod types;

pub use error::InputError;
pub use snapshot::{
    Pointer,
    PointerSlot,
    PointerSnapshot,
    SlotPhase,
    CLEARED_POSITION,
    PARKED_POSITION,
};
pub use tracker::{ApplyReport, PointerTracker};
pub use types::{PointerBatch, PointerId, PointerSample, TouchEvent, MAX_POINTERS};
