use super::types::PointerId;

/// Pointer-level failures.
///
/// The tracker never lets these escape `PointerTracker::apply`; input devices are not
/// trusted to respect the slot limit, so offending samples are dropped and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("pointer id {id} is outside the supported range 0..{capacity}")]
    OutOfRange { id: PointerId, capacity: usize },
}
