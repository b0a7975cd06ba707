use super::registry::ParticleId;

/// Attribute-store contract violations. These surface to the caller; nothing is
/// silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QualityError {
    #[error("particle {particle} already has a quality named `{name}`")]
    Duplicate { particle: ParticleId, name: String },

    #[error("no quality `{name}` on particle {particle} and no registered default")]
    NoSuchAttribute { particle: ParticleId, name: String },

    #[error("unknown particle {0}")]
    UnknownParticle(ParticleId),
}
