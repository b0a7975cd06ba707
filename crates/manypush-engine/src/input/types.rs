use smallvec::SmallVec;

/// Number of pointer slots tracked per surface.
///
/// Fixed so the snapshot stays a small `Copy` value that is cheap to hand across threads.
pub const MAX_POINTERS: usize = 8;

/// Dense pointer id assigned by the input source, stable for the life of a touch.
pub type PointerId = usize;

/// One pointer position in physical surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSample {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    #[inline]
    pub const fn new(id: PointerId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// Positions of every active pointer carried by a single move event.
pub type PointerBatch = SmallVec<[PointerSample; MAX_POINTERS]>;

/// Platform-agnostic multi-touch events.
///
/// Mirrors how mobile input systems report gestures: a move carries the full set of
/// active pointers, not only the one that changed.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchEvent {
    /// First pointer of a gesture went down.
    Down(PointerSample),
    /// Additional pointer went down while others are held.
    PointerDown(PointerSample),
    /// One or more pointers moved; contains every active pointer.
    Move(PointerBatch),
    /// A pointer lifted while others remain down.
    PointerUp(PointerId),
    /// The last pointer lifted.
    Up(PointerId),
    /// Gesture aborted by the platform.
    Cancel,
}

impl TouchEvent {
    /// Short action name, used in logs.
    pub fn action(&self) -> &'static str {
        match self {
            TouchEvent::Down(_) => "down",
            TouchEvent::PointerDown(_) => "pointer-down",
            TouchEvent::Move(_) => "move",
            TouchEvent::PointerUp(_) => "pointer-up",
            TouchEvent::Up(_) => "up",
            TouchEvent::Cancel => "cancel",
        }
    }
}
