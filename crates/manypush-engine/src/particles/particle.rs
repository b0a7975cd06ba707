use super::error::QualityError;
use super::quality::Quality;
use super::registry::ParticleId;

/// A particle and its per-particle quality overrides.
///
/// Qualities keep insertion order and are never removed; names are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    id: ParticleId,
    qualities: Vec<Quality>,
}

impl Particle {
    pub(crate) fn new(id: ParticleId) -> Self {
        Self {
            id,
            qualities: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> ParticleId {
        self.id
    }

    /// This particle's own value for `name`. Defaults are not consulted.
    pub fn quality(&self, name: &str) -> Option<f32> {
        self.qualities.iter().find(|q| q.name == name).map(|q| q.value)
    }

    pub fn qualities(&self) -> impl Iterator<Item = &Quality> {
        self.qualities.iter()
    }

    pub fn len(&self) -> usize {
        self.qualities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qualities.is_empty()
    }

    /// Appends a new quality. Fails if the name is already present.
    pub fn add_quality(&mut self, quality: Quality) -> Result<(), QualityError> {
        if self.quality(&quality.name).is_some() {
            return Err(QualityError::Duplicate {
                particle: self.id,
                name: quality.name,
            });
        }
        self.qualities.push(quality);
        Ok(())
    }

    /// Replaces the value of `name` in place, or appends it when absent.
    pub fn set_quality(&mut self, name: &str, value: f32) {
        match self.qualities.iter_mut().find(|q| q.name == name) {
            Some(q) => q.value = value,
            None => self.qualities.push(Quality::new(name, value)),
        }
    }
}
