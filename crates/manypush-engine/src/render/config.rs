use std::time::Duration;

use glam::Vec3;

/// Fixed camera placement.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub look: Vec3,
    pub up: Vec3,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 1.5),
            look: Vec3::new(0.0, 0.0, -5.0),
            up: Vec3::Y,
            near: 1.0,
            far: 10.0,
        }
    }
}

/// Scene-level render settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub camera: CameraConfig,

    /// Time for one full sprite rotation.
    pub rotation_period: Duration,

    /// Linear RGBA clear color.
    pub clear_color: [f32; 4],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            rotation_period: Duration::from_secs(10),
            clear_color: [0.5, 0.5, 0.5, 0.5],
        }
    }
}
