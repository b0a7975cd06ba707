//! Particles and their sparse, default-backed qualities.
//!
//! A particle stores only the qualities it overrides. Lookups fall through to the
//! process-wide defaults held by [`QualityStore`], so "no override" is a real absence
//! rather than a copy of the default taken at creation time.

mod error;
mod particle;
mod quality;
mod registry;

pub use error::QualityError;
pub use particle::Particle;
pub use quality::{names, Quality, QualityStore};
pub use registry::{ParticleId, ParticleRegistry};
