//! Cross-context state handoff.
//!
//! The input context owns the live pointer table; the render context only ever
//! receives immutable snapshots through [`FrameStateChannel`].

mod frame_state;

pub use frame_state::FrameStateChannel;
