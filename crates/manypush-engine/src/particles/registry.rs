use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::error::QualityError;
use super::particle::Particle;
use super::quality::{Quality, QualityStore};

/// Dense particle handle issued by a [`ParticleRegistry`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ParticleId(pub usize);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns every particle and resolves their qualities against a shared [`QualityStore`].
///
/// Shared between contexts behind an `Arc`; reads from the render loop take a read
/// lock for the duration of a single lookup.
#[derive(Debug)]
pub struct ParticleRegistry {
    store: Arc<QualityStore>,
    particles: RwLock<Vec<Particle>>,
}

impl ParticleRegistry {
    pub fn new(store: Arc<QualityStore>) -> Self {
        Self {
            store,
            particles: RwLock::new(Vec::new()),
        }
    }

    #[inline]
    pub fn store(&self) -> &Arc<QualityStore> {
        &self.store
    }

    /// Creates a particle with no qualities of its own.
    pub fn create_particle(&self) -> ParticleId {
        let mut particles = self.particles.write();
        let id = ParticleId(particles.len());
        particles.push(Particle::new(id));
        id
    }

    /// Creates particles until the registry holds at least `count`.
    pub fn ensure_len(&self, count: usize) {
        let mut particles = self.particles.write();
        while particles.len() < count {
            let id = ParticleId(particles.len());
            particles.push(Particle::new(id));
        }
    }

    pub fn len(&self) -> usize {
        self.particles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.read().is_empty()
    }

    /// Appends a quality; fails with [`QualityError::Duplicate`] if the name exists.
    pub fn add_quality(&self, id: ParticleId, name: &str, value: f32) -> Result<(), QualityError> {
        let mut particles = self.particles.write();
        let particle = particles.get_mut(id.0).ok_or(QualityError::UnknownParticle(id))?;
        particle.add_quality(Quality::new(name, value))
    }

    /// Sets a per-particle override, replacing an existing one.
    pub fn set_quality(&self, id: ParticleId, name: &str, value: f32) -> Result<(), QualityError> {
        let mut particles = self.particles.write();
        let particle = particles.get_mut(id.0).ok_or(QualityError::UnknownParticle(id))?;
        particle.set_quality(name, value);
        Ok(())
    }

    /// Effective value: the particle's override, else the store default.
    pub fn effective(&self, id: ParticleId, name: &str) -> Result<f32, QualityError> {
        let particles = self.particles.read();
        let particle = particles.get(id.0).ok_or(QualityError::UnknownParticle(id))?;
        self.store.effective(particle, name)
    }

    /// Runs `f` against a particle without cloning it.
    pub fn with_particle<R>(&self, id: ParticleId, f: impl FnOnce(&Particle) -> R) -> Result<R, QualityError> {
        let particles = self.particles.read();
        particles
            .get(id.0)
            .map(f)
            .ok_or(QualityError::UnknownParticle(id))
    }
}

impl Default for ParticleRegistry {
    fn default() -> Self {
        Self::new(Arc::new(QualityStore::new()))
    }
}
