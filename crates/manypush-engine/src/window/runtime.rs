use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use parking_lot::Mutex;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit};
use crate::input::platform::TouchTranslator;
use crate::input::PointerTracker;
use crate::particles::ParticleRegistry;
use crate::render::wgpu::WgpuBackend;
use crate::render::{RenderPipeline, SceneConfig};
use crate::sync::FrameStateChannel;
use crate::time::FrameClock;

/// Back-off while the surface is zero-sized and frames are skipped.
const IDLE_FRAME: Duration = Duration::from_millis(16);

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "manypush".to_string(),
            initial_size: LogicalSize::new(720.0, 1280.0),
        }
    }
}

/// Messages from the render thread to the event loop.
#[derive(Debug)]
enum RuntimeEvent {
    /// The render thread exited on its own; `Some` carries the fatal error.
    RenderStopped(Option<String>),
}

/// Entry point for the runtime.
///
/// The calling thread runs the winit event loop and owns input; rendering happens
/// on a dedicated thread that only sees published pointer snapshots.
pub struct Runtime;

impl Runtime {
    pub fn run(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        scene: SceneConfig,
        registry: Arc<ParticleRegistry>,
    ) -> Result<()> {
        let event_loop = EventLoop::<RuntimeEvent>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;
        let proxy = event_loop.create_proxy();

        let mut state = AppState::new(config, gpu_init, scene, registry, proxy);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.stop_render_thread();

        match state.failure.take() {
            Some(reason) => Err(anyhow::anyhow!(reason)).context("render thread failed"),
            None => Ok(()),
        }
    }
}

// ── render thread ─────────────────────────────────────────────────────────

/// State shared between the event loop and the render thread.
#[derive(Debug, Default)]
struct RenderShared {
    stop: AtomicBool,
    pending_size: Mutex<Option<PhysicalSize<u32>>>,
}

impl RenderShared {
    /// Latest size wins; intermediate sizes from a drag-resize are never applied.
    fn request_resize(&self, size: PhysicalSize<u32>) {
        *self.pending_size.lock() = Some(size);
    }

    fn take_resize(&self) -> Option<PhysicalSize<u32>> {
        self.pending_size.lock().take()
    }

    fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

struct RenderThread {
    shared: Arc<RenderShared>,
    handle: JoinHandle<()>,
}

/// Everything the render thread takes ownership of.
struct RenderSetup {
    gpu: Gpu<'static>,
    scene: SceneConfig,
    frames: FrameStateChannel,
    registry: Arc<ParticleRegistry>,
    clock_origin: Instant,
}

impl RenderThread {
    fn spawn(setup: RenderSetup, proxy: EventLoopProxy<RuntimeEvent>) -> Result<Self> {
        let shared = Arc::new(RenderShared::default());
        let thread_shared = Arc::clone(&shared);

        let handle = thread::Builder::new()
            .name("manypush-render".to_string())
            .spawn(move || {
                let failure = match render_loop(setup, &thread_shared) {
                    Ok(()) => None,
                    Err(e) => {
                        log::error!("render thread failed: {e:#}");
                        Some(format!("{e:#}"))
                    }
                };
                if !thread_shared.should_stop() {
                    // The loop may already be gone during shutdown.
                    let _ = proxy.send_event(RuntimeEvent::RenderStopped(failure));
                }
            })
            .context("failed to spawn render thread")?;

        Ok(Self { shared, handle })
    }

    fn request_resize(&self, size: PhysicalSize<u32>) {
        self.shared.request_resize(size);
    }

    fn stop(self) {
        self.shared.request_stop();
        if self.handle.join().is_err() {
            log::error!("render thread panicked");
        }
    }
}

fn render_loop(setup: RenderSetup, shared: &RenderShared) -> Result<()> {
    let RenderSetup {
        gpu,
        scene,
        frames,
        registry,
        clock_origin,
    } = setup;

    let size = gpu.size();
    let backend = WgpuBackend::new(gpu);
    let caps = backend.viewport_caps();
    let mut pipeline = RenderPipeline::new(backend, frames, registry, scene);

    pipeline.on_surface_created(caps)?;
    pipeline.on_surface_changed(size.width, size.height)?;

    let mut clock = FrameClock::starting_at(clock_origin);
    log::info!("render thread started");

    while !shared.should_stop() {
        if let Some(size) = shared.take_resize() {
            pipeline.on_surface_changed(size.width, size.height)?;
        }

        let time = clock.tick();
        match pipeline.on_draw_frame(&time) {
            Ok(report) if report.skipped => thread::sleep(IDLE_FRAME),
            Ok(_) => {}
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => log::warn!("frame {} dropped: {e}", time.frame_index),
        }
    }

    log::info!("render thread stopped");
    Ok(())
}

// ── event loop ────────────────────────────────────────────────────────────

struct AppState {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    scene: SceneConfig,
    registry: Arc<ParticleRegistry>,
    proxy: EventLoopProxy<RuntimeEvent>,

    window: Option<Arc<Window>>,
    render: Option<RenderThread>,

    translator: TouchTranslator,
    tracker: PointerTracker,
    frames: FrameStateChannel,
    /// Rotation timeline origin, shared by every render thread this process spawns.
    clock_origin: Instant,

    failure: Option<String>,
}

impl AppState {
    fn new(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        scene: SceneConfig,
        registry: Arc<ParticleRegistry>,
        proxy: EventLoopProxy<RuntimeEvent>,
    ) -> Self {
        Self {
            config,
            gpu_init,
            scene,
            registry,
            proxy,
            window: None,
            render: None,
            translator: TouchTranslator::new(),
            tracker: PointerTracker::new(),
            frames: FrameStateChannel::new(),
            clock_origin: Instant::now(),
            failure: None,
        }
    }

    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>> {
        if let Some(window) = &self.window {
            return Ok(Arc::clone(window));
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        self.window = Some(Arc::clone(&window));
        Ok(window)
    }

    fn start_render_thread(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        if self.render.is_some() {
            return Ok(());
        }

        let window = self.ensure_window(event_loop)?;
        let size = window.inner_size();

        // Surface creation stays on the event loop thread; some platforms require it.
        let gpu = pollster::block_on(Gpu::new(window, size, self.gpu_init.clone()))
            .context("GPU initialization failed")?;

        let setup = RenderSetup {
            gpu,
            scene: self.scene.clone(),
            frames: self.frames.clone(),
            registry: Arc::clone(&self.registry),
            clock_origin: self.clock_origin,
        };
        self.render = Some(RenderThread::spawn(setup, self.proxy.clone())?);
        Ok(())
    }

    fn stop_render_thread(&mut self) {
        if let Some(render) = self.render.take() {
            render.stop();
        }
    }

    fn on_touch_event(&mut self, event: &WindowEvent) {
        let Some(touch) = self.translator.translate(event) else {
            return;
        };

        let report = self.tracker.apply(&touch);
        log::trace!(
            "{}: {} updated, {} dropped",
            touch.action(),
            report.updated,
            report.dropped
        );
        self.frames.publish(self.tracker.snapshot());
    }
}

impl ApplicationHandler<RuntimeEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        if let Err(e) = self.start_render_thread(event_loop) {
            log::error!("failed to start rendering: {e:#}");
            self.failure = Some(format!("{e:#}"));
            event_loop.exit();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // The platform may destroy the surface while suspended; rebuild on resume.
        self.stop_render_thread();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(render) = &self.render {
                    render.request_resize(*size);
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(render), Some(window)) = (&self.render, &self.window) {
                    render.request_resize(window.inner_size());
                }
            }

            _ => self.on_touch_event(&event),
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: RuntimeEvent) {
        match event {
            RuntimeEvent::RenderStopped(failure) => {
                if let Some(render) = self.render.take() {
                    render.stop();
                }
                self.failure = failure;
                event_loop.exit();
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.stop_render_thread();
    }
}
