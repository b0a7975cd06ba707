//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window. Input is handled on the event loop
//! thread; the GPU and render pipeline live on a dedicated render thread.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
