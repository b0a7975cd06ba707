use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic time since the clock was created. Drives time-based animation.
    pub elapsed: Duration,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// A frame at a fixed offset from the clock origin. Useful for deterministic replays.
    pub fn at(elapsed: Duration) -> Self {
        Self {
            dt: 0.0,
            elapsed,
            frame_index: 0,
        }
    }
}

/// Frame clock producing `FrameTime` snapshots, one per render loop.
///
/// Delta time is clamped so a stalled or suspended loop does not report huge steps;
/// `elapsed` is not clamped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    const DT_MIN: Duration = Duration::from_micros(100);
    const DT_MAX: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock whose `elapsed` counts from `origin` instead of now.
    ///
    /// A clock rebuilt with the same origin continues the same animation timeline.
    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            last: Instant::now(),
            frame_index: 0,
            dt_min: Self::DT_MIN,
            dt_max: Self::DT_MAX,
        }
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            dt_min,
            dt_max,
            ..Self::new()
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.origin),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotation angle in degrees for a full turn every `period`.
///
/// Purely a function of `elapsed` at millisecond resolution, so two runs at the same
/// offset produce the same angle. A zero period yields `0.0`.
pub fn rotation_angle_degrees(elapsed: Duration, period: Duration) -> f32 {
    let period_ms = period.as_millis();
    if period_ms == 0 {
        return 0.0;
    }
    let phase_ms = elapsed.as_millis() % period_ms;
    360.0 * phase_ms as f32 / period_ms as f32
}
