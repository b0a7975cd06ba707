use std::sync::Arc;

use glam::{Mat4, Vec3};

use super::backend::{DrawCall, GpuBackend, ViewportCaps};
use super::camera::{model_matrix, projection_matrix, view_matrix};
use super::config::SceneConfig;
use super::error::RenderError;
use super::mesh::{ProgramLayout, TriangleMesh};
use crate::coords::{screen_to_ndc, Viewport};
use crate::input::MAX_POINTERS;
use crate::particles::{names, ParticleId, ParticleRegistry};
use crate::sync::FrameStateChannel;
use crate::time::{rotation_angle_degrees, FrameTime};

/// Lifecycle of a [`RenderPipeline`].
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    /// No program yet; frames are skipped.
    Uninitialized,
    /// Program linked; frames draw once a valid surface size is known.
    Ready,
    /// Inside `on_draw_frame`.
    Drawing,
    /// A fatal error occurred; every later call returns it again.
    Failed(RenderError),
}

/// Result of one `on_draw_frame` call.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameReport {
    pub draw_calls: usize,
    /// The frame was not drawn because the surface is not ready yet.
    pub skipped: bool,
}

impl FrameReport {
    const SKIPPED: Self = Self {
        draw_calls: 0,
        skipped: true,
    };
}

/// Per-frame sprite renderer driven by pointer snapshots.
///
/// Slot `i` of the pointer table is bound to particle `i` of the registry; the
/// particle's `scale` quality sizes its sprite.
pub struct RenderPipeline<B: GpuBackend> {
    backend: B,
    program: Option<B::Program>,
    state: PipelineState,

    frames: FrameStateChannel,
    registry: Arc<ParticleRegistry>,
    config: SceneConfig,

    caps: ViewportCaps,
    viewport: Viewport,
    view: Mat4,
    projection: Mat4,

    draws: Vec<DrawCall>,
    warned_not_ready: bool,
}

impl<B: GpuBackend> RenderPipeline<B> {
    pub fn new(
        backend: B,
        frames: FrameStateChannel,
        registry: Arc<ParticleRegistry>,
        config: SceneConfig,
    ) -> Self {
        registry.ensure_len(MAX_POINTERS);
        registry.store().set_default_if_absent(names::SCALE, 1.0);

        Self {
            backend,
            program: None,
            state: PipelineState::Uninitialized,
            frames,
            registry,
            caps: ViewportCaps::default(),
            viewport: Viewport::default(),
            view: view_matrix(&config.camera),
            projection: Mat4::IDENTITY,
            config,
            draws: Vec::with_capacity(MAX_POINTERS),
            warned_not_ready: false,
        }
    }

    #[inline]
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn check_alive(&self) -> Result<(), RenderError> {
        match &self.state {
            PipelineState::Failed(e) => Err(e.clone()),
            _ => Ok(()),
        }
    }

    fn fail(&mut self, err: RenderError) -> RenderError {
        log::error!("render pipeline failed: {err}");
        self.state = PipelineState::Failed(err.clone());
        self.program = None;
        err
    }

    /// Builds the view matrix and links the GPU program.
    ///
    /// May be called again when the platform recreates the surface; the program is
    /// relinked each time.
    pub fn on_surface_created(&mut self, caps: ViewportCaps) -> Result<(), RenderError> {
        self.check_alive()?;

        self.caps = caps;
        self.view = view_matrix(&self.config.camera);

        match self.backend.link_program(&ProgramLayout::TRIANGLE, &caps) {
            Ok(program) => {
                self.program = Some(program);
                self.state = PipelineState::Ready;
                self.warned_not_ready = false;
                log::info!("render pipeline ready");

                // A size reported before these caps existed still needs clamping.
                if self.viewport.is_valid() {
                    self.resize_backend();
                }
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Records the new surface size and rebuilds the projection.
    ///
    /// The viewport always holds the reported size, since touches arrive in those
    /// pixels. Only the backend's render target is clamped to the caps.
    /// Zero-sized surfaces (minimized windows) are recorded but leave drawing paused.
    pub fn on_surface_changed(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.check_alive()?;

        self.viewport = Viewport::new(width as f32, height as f32);

        if !self.viewport.is_valid() {
            log::debug!("surface changed to {width}x{height}; drawing paused");
            return Ok(());
        }

        self.projection = projection_matrix(self.viewport, &self.config.camera);
        self.resize_backend();
        self.warned_not_ready = false;

        log::info!(
            "surface {width}x{height} ({:?})",
            self.viewport.orientation()
        );
        Ok(())
    }

    fn resize_backend(&mut self) {
        let width = (self.viewport.width as u32).min(self.caps.max_width);
        let height = (self.viewport.height as u32).min(self.caps.max_height);
        self.backend.resize(width, height);
    }

    /// Draws one sprite per active pointer from the latest published snapshot.
    pub fn on_draw_frame(&mut self, time: &FrameTime) -> Result<FrameReport, RenderError> {
        self.check_alive()?;

        if self.state != PipelineState::Ready || !self.viewport.is_valid() {
            if !self.warned_not_ready {
                log::warn!("draw requested before the surface is ready; skipping");
                self.warned_not_ready = true;
            }
            return Ok(FrameReport::SKIPPED);
        }

        self.state = PipelineState::Drawing;
        let result = self.build_draws(time);
        self.state = PipelineState::Ready;
        result?;

        let Some(program) = self.program.as_ref() else {
            return Ok(FrameReport::SKIPPED);
        };

        match self.backend.submit_frame(
            program,
            &TriangleMesh::SPRITE,
            &self.draws,
            self.config.clear_color,
        ) {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(self.fail(e)),
            Err(e) => return Err(e),
        }

        log::trace!("frame {}: {} draw calls", time.frame_index, self.draws.len());
        Ok(FrameReport {
            draw_calls: self.draws.len(),
            skipped: false,
        })
    }

    fn build_draws(&mut self, time: &FrameTime) -> Result<(), RenderError> {
        self.draws.clear();

        let Some(snapshot) = self.frames.latest() else {
            return Ok(());
        };

        let angle = rotation_angle_degrees(time.elapsed, self.config.rotation_period);
        let view_projection = self.projection * self.view;

        for (slot, screen) in snapshot.active() {
            let Some(ndc) = screen_to_ndc(screen, self.viewport) else {
                continue;
            };
            let scale = self.registry.effective(ParticleId(slot), names::SCALE)?;
            let model = model_matrix(Vec3::new(ndc.x, ndc.y, 0.0), angle, scale);

            self.draws.push(DrawCall {
                slot,
                mvp: view_projection * model,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::{Vec2, Vec4};

    use super::*;
    use crate::input::{PointerSample, PointerTracker, TouchEvent};
    use crate::particles::QualityStore;

    #[derive(Debug, Default)]
    struct Recorder {
        fail_link: bool,
        fail_submit: bool,
        links: usize,
        resizes: Vec<(u32, u32)>,
        frames: Vec<Vec<DrawCall>>,
    }

    impl GpuBackend for Recorder {
        type Program = ProgramLayout;

        fn link_program(
            &mut self,
            layout: &ProgramLayout,
            _caps: &ViewportCaps,
        ) -> Result<ProgramLayout, RenderError> {
            self.links += 1;
            if self.fail_link {
                return Err(RenderError::ProgramLink("vertex stage rejected".into()));
            }
            Ok(*layout)
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.resizes.push((width, height));
        }

        fn submit_frame(
            &mut self,
            program: &ProgramLayout,
            mesh: &TriangleMesh,
            draws: &[DrawCall],
            _clear: [f32; 4],
        ) -> Result<(), RenderError> {
            assert_eq!(*program, ProgramLayout::TRIANGLE);
            assert_eq!(*mesh, TriangleMesh::SPRITE);
            if self.fail_submit {
                return Err(RenderError::Surface("out of memory".into()));
            }
            self.frames.push(draws.to_vec());
            Ok(())
        }
    }

    struct Harness {
        pipeline: RenderPipeline<Recorder>,
        tracker: PointerTracker,
        frames: FrameStateChannel,
        registry: Arc<ParticleRegistry>,
    }

    impl Harness {
        fn new(backend: Recorder) -> Self {
            let frames = FrameStateChannel::new();
            let registry = Arc::new(ParticleRegistry::new(Arc::new(QualityStore::new())));
            let pipeline = RenderPipeline::new(
                backend,
                frames.clone(),
                Arc::clone(&registry),
                SceneConfig::default(),
            );
            Self {
                pipeline,
                tracker: PointerTracker::new(),
                frames,
                registry,
            }
        }

        fn ready(width: u32, height: u32) -> Self {
            let mut h = Self::new(Recorder::default());
            h.pipeline.on_surface_created(ViewportCaps::default()).unwrap();
            h.pipeline.on_surface_changed(width, height).unwrap();
            h
        }

        fn touch(&mut self, ev: TouchEvent) {
            self.tracker.apply(&ev);
            self.frames.publish(self.tracker.snapshot());
        }

        fn draw_at(&mut self, ms: u64) -> FrameReport {
            self.pipeline
                .on_draw_frame(&FrameTime::at(Duration::from_millis(ms)))
                .unwrap()
        }

        fn last_frame(&self) -> &[DrawCall] {
            self.pipeline.backend().frames.last().unwrap()
        }
    }

    fn clip_xy(mvp: Mat4) -> Vec2 {
        let c = mvp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        Vec2::new(c.x / c.w, c.y / c.w)
    }

    // ── lifecycle ────────────────────────────────────────────────────────

    #[test]
    fn starts_uninitialized_and_skips_frames() {
        let mut h = Harness::new(Recorder::default());
        assert_eq!(*h.pipeline.state(), PipelineState::Uninitialized);
        assert_eq!(h.draw_at(0), FrameReport { draw_calls: 0, skipped: true });
        assert!(h.pipeline.backend().frames.is_empty());
    }

    #[test]
    fn draw_before_surface_changed_is_skipped() {
        let mut h = Harness::new(Recorder::default());
        h.pipeline.on_surface_created(ViewportCaps::default()).unwrap();
        assert_eq!(*h.pipeline.state(), PipelineState::Ready);
        h.touch(TouchEvent::Down(PointerSample::new(0, 10.0, 10.0)));
        assert!(h.draw_at(0).skipped);
        assert!(h.pipeline.backend().frames.is_empty());
    }

    #[test]
    fn zero_sized_surface_pauses_drawing() {
        let mut h = Harness::ready(400, 800);
        h.pipeline.on_surface_changed(0, 800).unwrap();
        assert!(h.draw_at(0).skipped);
        h.pipeline.on_surface_changed(400, 800).unwrap();
        assert!(!h.draw_at(0).skipped);
        assert_eq!(h.pipeline.backend().resizes, [(400, 800), (400, 800)]);
    }

    #[test]
    fn surface_changed_may_repeat_before_first_draw() {
        let mut h = Harness::new(Recorder::default());
        h.pipeline.on_surface_changed(100, 100).unwrap();
        h.pipeline.on_surface_created(ViewportCaps::default()).unwrap();
        h.pipeline.on_surface_changed(800, 400).unwrap();
        h.pipeline.on_surface_changed(400, 800).unwrap();
        assert_eq!(h.pipeline.viewport(), Viewport::new(400.0, 800.0));
        assert!(!h.draw_at(0).skipped);
    }

    #[test]
    fn caps_clamp_the_render_target_not_the_viewport() {
        let mut h = Harness::new(Recorder::default());
        h.pipeline
            .on_surface_created(ViewportCaps { max_width: 256, max_height: 512 })
            .unwrap();
        h.pipeline.on_surface_changed(1000, 1000).unwrap();
        assert_eq!(h.pipeline.viewport(), Viewport::new(1000.0, 1000.0));
        assert_eq!(h.pipeline.backend().resizes, [(256, 512)]);
    }

    #[test]
    fn centre_of_oversized_surface_projects_to_clip_origin() {
        let mut h = Harness::new(Recorder::default());
        h.pipeline
            .on_surface_created(ViewportCaps { max_width: 256, max_height: 512 })
            .unwrap();
        h.pipeline.on_surface_changed(1000, 1000).unwrap();
        h.touch(TouchEvent::Down(PointerSample::new(0, 500.0, 500.0)));
        h.draw_at(0);

        let c = clip_xy(h.last_frame()[0].mvp);
        assert!(c.length() < 1e-6, "{c:?}");
    }

    #[test]
    fn late_caps_are_applied_to_an_earlier_size() {
        let mut h = Harness::new(Recorder::default());
        h.pipeline.on_surface_changed(1000, 1000).unwrap();
        h.pipeline
            .on_surface_created(ViewportCaps { max_width: 256, max_height: 512 })
            .unwrap();
        assert_eq!(h.pipeline.viewport(), Viewport::new(1000.0, 1000.0));
        assert_eq!(h.pipeline.backend().resizes, [(1000, 1000), (256, 512)]);
    }

    #[test]
    fn link_failure_is_fatal_and_sticky() {
        let mut h = Harness::new(Recorder {
            fail_link: true,
            ..Recorder::default()
        });
        let err = h.pipeline.on_surface_created(ViewportCaps::default()).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(h.pipeline.state(), PipelineState::Failed(_)));

        assert_eq!(h.pipeline.on_surface_changed(400, 800), Err(err.clone()));
        assert_eq!(
            h.pipeline.on_draw_frame(&FrameTime::at(Duration::ZERO)),
            Err(err.clone())
        );
        assert_eq!(h.pipeline.on_surface_created(ViewportCaps::default()), Err(err));
        assert_eq!(h.pipeline.backend().links, 1);
    }

    #[test]
    fn fatal_submit_error_fails_the_pipeline() {
        let mut h = Harness::ready(400, 800);
        h.pipeline.backend_mut().fail_submit = true;
        let err = h
            .pipeline
            .on_draw_frame(&FrameTime::at(Duration::ZERO))
            .unwrap_err();
        assert_eq!(err, RenderError::Surface("out of memory".into()));
        assert!(matches!(h.pipeline.state(), PipelineState::Failed(_)));
    }

    // ── drawing ──────────────────────────────────────────────────────────

    #[test]
    fn no_input_yet_still_clears() {
        let mut h = Harness::ready(400, 800);
        assert_eq!(h.draw_at(0), FrameReport { draw_calls: 0, skipped: false });
        assert!(h.last_frame().is_empty());
        assert_eq!(*h.pipeline.state(), PipelineState::Ready);
    }

    #[test]
    fn one_draw_per_active_pointer() {
        let mut h = Harness::ready(400, 800);
        h.touch(TouchEvent::Down(PointerSample::new(0, 100.0, 100.0)));
        h.touch(TouchEvent::PointerDown(PointerSample::new(3, 200.0, 300.0)));
        h.touch(TouchEvent::PointerDown(PointerSample::new(5, 50.0, 700.0)));
        h.touch(TouchEvent::PointerUp(3));

        let report = h.draw_at(0);
        assert_eq!(report.draw_calls, 2);
        let slots: Vec<_> = h.last_frame().iter().map(|d| d.slot).collect();
        assert_eq!(slots, [0, 5]);
    }

    #[test]
    fn parked_and_cleared_slots_are_not_drawn() {
        let mut h = Harness::ready(400, 800);
        h.touch(TouchEvent::Down(PointerSample::new(0, 10.0, 10.0)));
        h.touch(TouchEvent::PointerDown(PointerSample::new(1, 20.0, 20.0)));
        h.touch(TouchEvent::PointerUp(1));
        h.touch(TouchEvent::Up(0));
        assert_eq!(h.draw_at(0).draw_calls, 0);
    }

    #[test]
    fn centre_touch_projects_to_clip_origin() {
        let mut h = Harness::ready(400, 800);
        h.touch(TouchEvent::Down(PointerSample::new(0, 200.0, 400.0)));
        h.draw_at(1_234);
        let c = clip_xy(h.last_frame()[0].mvp);
        assert!(c.length() < 1e-6, "{c:?}");
    }

    #[test]
    fn mvp_is_projection_view_model() {
        let mut h = Harness::ready(800, 400);
        h.touch(TouchEvent::Down(PointerSample::new(2, 0.0, 0.0)));
        h.draw_at(2_500);

        let expected = h.pipeline.projection_matrix()
            * h.pipeline.view_matrix()
            * model_matrix(Vec3::new(-2.0, 1.0, 0.0), 90.0, 1.0);
        let got = h.last_frame()[0].mvp;
        assert!(got.abs_diff_eq(expected, 1e-5), "{got:?}\n{expected:?}");
    }

    #[test]
    fn angle_depends_only_on_elapsed_time() {
        let mut h = Harness::ready(400, 800);
        h.touch(TouchEvent::Down(PointerSample::new(0, 120.0, 340.0)));
        h.draw_at(3_333);
        let a = h.last_frame()[0].mvp;
        h.draw_at(13_333);
        let b = h.last_frame()[0].mvp;
        assert!(a.abs_diff_eq(b, 1e-5));
    }

    #[test]
    fn scale_quality_sizes_the_sprite() {
        let mut h = Harness::ready(400, 800);
        h.registry.set_quality(ParticleId(1), names::SCALE, 2.0).unwrap();
        h.touch(TouchEvent::Down(PointerSample::new(0, 200.0, 400.0)));
        h.touch(TouchEvent::PointerDown(PointerSample::new(1, 200.0, 400.0)));
        h.draw_at(0);

        let frame = h.last_frame();
        let unit = frame[0].mvp * Vec4::new(0.5, 0.0, 0.0, 1.0);
        let big = frame[1].mvp * Vec4::new(0.25, 0.0, 0.0, 1.0);
        assert!((unit.x / unit.w - big.x / big.w).abs() < 1e-6);
    }

    #[test]
    fn registry_is_sized_to_the_slot_table() {
        let h = Harness::new(Recorder::default());
        assert_eq!(h.registry.len(), MAX_POINTERS);
        assert_eq!(h.registry.store().default_value(names::SCALE), Some(1.0));
    }
}
