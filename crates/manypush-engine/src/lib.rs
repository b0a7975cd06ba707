//! manypush engine crate.
//!
//! Multi-touch input feeding a per-frame sprite renderer. Input runs on the
//! platform event loop and publishes immutable pointer snapshots; a render thread
//! draws one rotating sprite per active pointer, sized by its particle's qualities.

pub mod coords;
pub mod device;
pub mod input;
pub mod particles;
pub mod render;
pub mod sync;
pub mod time;
pub mod window;

pub mod logging;
