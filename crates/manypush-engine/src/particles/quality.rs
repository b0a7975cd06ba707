use std::collections::HashMap;

use parking_lot::RwLock;

use super::error::QualityError;
use super::particle::Particle;

/// Well-known quality names.
pub mod names {
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const MASS: &str = "mass";
    pub const CHARGE: &str = "charge";
    /// Uniform sprite scale applied by the render pipeline.
    pub const SCALE: &str = "scale";
}

/// A named scalar attribute attached to one particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Quality {
    pub name: String,
    pub value: f32,
}

impl Quality {
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Process-wide default values for qualities.
///
/// Particles store only overrides; anything they lack resolves here at lookup time.
/// Changing a default therefore applies to every particle that has not overridden it.
///
/// Safe to mutate from one context while others read: each update is a single
/// write-locked insert, so readers observe either the old or the new value.
#[derive(Debug, Default)]
pub struct QualityStore {
    defaults: RwLock<HashMap<String, f32>>,
}

impl QualityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default(&self, name: impl Into<String>, value: f32) {
        let name = name.into();
        log::debug!("default quality `{name}` = {value}");
        self.defaults.write().insert(name, value);
    }

    /// Registers `value` only when no default exists yet. Returns the default in effect.
    pub fn set_default_if_absent(&self, name: &str, value: f32) -> f32 {
        if let Some(v) = self.default_value(name) {
            return v;
        }
        *self.defaults.write().entry(name.to_owned()).or_insert(value)
    }

    pub fn default_value(&self, name: &str) -> Option<f32> {
        self.defaults.read().get(name).copied()
    }

    /// Effective value of `name` for `particle`: its own override if present, else the default.
    pub fn effective(&self, particle: &Particle, name: &str) -> Result<f32, QualityError> {
        particle
            .quality(name)
            .or_else(|| self.default_value(name))
            .ok_or_else(|| QualityError::NoSuchAttribute {
                particle: particle.id(),
                name: name.to_owned(),
            })
    }
}
