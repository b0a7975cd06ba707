//! Time subsystem.
//!
//! Provides frame timing utilities without coupling to the runtime:
//! - one `FrameClock` per render loop, `tick()` once per presented frame
//! - animation derived from elapsed time only, never from accumulated state

mod frame_clock;

pub use frame_clock::{rotation_angle_degrees, FrameClock, FrameTime};
