//! Coordinate spaces shared by input and rendering.
//!
//! Touch space:
//! - Physical pixels of the current surface
//! - Origin top-left, +X right, +Y down
//!
//! NDC space (pre-projection):
//! - Origin at the surface center, +Y up
//! - Short side spans `[-1, 1]`, long side is stretched by the aspect ratio

mod ndc;
mod viewport;

pub use ndc::{ndc_to_screen, screen_to_ndc};
pub use viewport::{Orientation, Viewport};
