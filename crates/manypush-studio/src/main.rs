use std::sync::Arc;

use anyhow::Result;

use manypush_engine::device::GpuInit;
use manypush_engine::logging::{init_logging, LoggingConfig};
use manypush_engine::particles::{names, ParticleId, ParticleRegistry, QualityStore};
use manypush_engine::render::SceneConfig;
use manypush_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let store = Arc::new(QualityStore::new());
    store.set_default(names::MASS, 1.0);
    store.set_default(names::CHARGE, 0.0);
    store.set_default(names::SCALE, 1.0);

    let registry = Arc::new(ParticleRegistry::new(store));

    // The first finger gets a heavier, larger sprite; every other slot uses the defaults.
    let first = registry.create_particle();
    debug_assert_eq!(first, ParticleId(0));
    registry.add_quality(first, names::MASS, 4.0)?;
    registry.add_quality(first, names::SCALE, 1.5)?;

    log::info!(
        "particle {first}: mass {}, scale {}",
        registry.effective(first, names::MASS)?,
        registry.effective(first, names::SCALE)?
    );

    Runtime::run(
        RuntimeConfig::default(),
        GpuInit::default(),
        SceneConfig::default(),
        registry,
    )
}
