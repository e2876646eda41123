//! Window lifecycle and the two-thread run loop.
//!
//! The winit event thread blocks waiting for events and writes the shared
//! input state; a dedicated render thread drives the frame loop. The two
//! share one mutex guarding presentation against window destruction: the
//! render thread holds it while presenting, the shutdown path holds it while
//! dropping the window, so the window can never go away mid-present.

use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Arc, Mutex,
};
use std::thread::JoinHandle;

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowAttributes},
};

use crate::{
    config::WindowConfig,
    error::{Error, Result},
    gfx::{renderer::Renderer, scene::SandboxScene, Releasable},
    input::{CursorTracker, InputState, MoveKey},
    util::timer::FrameTimer,
};

const CURSOR_SENSITIVITY: f64 = 0.05;

/// Latest framebuffer size as reported by the event thread.
struct SurfaceSize {
    width: AtomicU32,
    height: AtomicU32,
}

/// The sandbox application: owns the event loop and spawns the render thread
/// once the window exists.
pub struct SandboxApp {
    event_loop: EventLoop<RenderThreadExit>,
    state: AppState,
}

/// Message sent from the render thread when it stops on its own.
struct RenderThreadExit;

struct AppState {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    proxy: EventLoopProxy<RenderThreadExit>,
    input: Arc<InputState>,
    cursor: CursorTracker,
    surface_size: Arc<SurfaceSize>,
    shutdown: Arc<AtomicBool>,
    present_lock: Arc<Mutex<()>>,
    render_thread: Option<JoinHandle<()>>,
}

impl SandboxApp {
    pub fn new(config: WindowConfig) -> Result<SandboxApp> {
        let event_loop = EventLoop::with_user_event()
            .build()
            .map_err(|err| Error::device(format!("failed to create event loop: {err}")))?;
        let proxy = event_loop.create_proxy();

        let surface_size = Arc::new(SurfaceSize {
            width: AtomicU32::new(config.width),
            height: AtomicU32::new(config.height),
        });

        Ok(SandboxApp {
            state: AppState {
                config,
                window: None,
                proxy,
                input: Arc::new(InputState::new()),
                cursor: CursorTracker::new(CURSOR_SENSITIVITY),
                surface_size,
                shutdown: Arc::new(AtomicBool::new(false)),
                present_lock: Arc::new(Mutex::new(())),
                render_thread: None,
            },
            event_loop,
        })
    }

    /// Runs until the window is closed. Consumes the app.
    pub fn run(self) -> Result<()> {
        let SandboxApp {
            event_loop,
            mut state,
        } = self;
        // The event thread blocks between events; the render thread is the
        // one that spins.
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop
            .run_app(&mut state)
            .map_err(|err| Error::device(format!("event loop error: {err}")))
    }
}

impl ApplicationHandler<RenderThreadExit> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(false);

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        // The camera owns the cursor. Not every platform supports locking;
        // confinement is the fallback.
        if window.set_cursor_grab(CursorGrabMode::Locked).is_err() {
            let _ = window.set_cursor_grab(CursorGrabMode::Confined);
        }
        window.set_cursor_visible(false);

        self.window = Some(window.clone());
        self.render_thread = Some(spawn_render_thread(
            window,
            self.config.clone(),
            self.input.clone(),
            self.surface_size.clone(),
            self.shutdown.clone(),
            self.present_lock.clone(),
            self.proxy.clone(),
        ));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                } else if let Some(key) = MoveKey::from_key_code(code) {
                    self.input.set_key(key, state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor.handle_move(position.x, position.y, &self.input);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width > 0 && height > 0 {
                    self.surface_size.width.store(width, Ordering::Relaxed);
                    self.surface_size.height.store(height, Ordering::Relaxed);
                }
            }
            _ => (),
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, _event: RenderThreadExit) {
        // The render thread stopped (most likely a fatal init error);
        // there is nothing left to present.
        event_loop.exit();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        info!("shutting down");
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.render_thread.take() {
            let _ = handle.join();
        }

        // Dropping our window handle is the destruction step; it must not
        // overlap a present.
        let guard = self
            .present_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.window.take();
        drop(guard);
        info!("window destroyed");
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_render_thread(
    window: Arc<Window>,
    config: WindowConfig,
    input: Arc<InputState>,
    surface_size: Arc<SurfaceSize>,
    shutdown: Arc<AtomicBool>,
    present_lock: Arc<Mutex<()>>,
    proxy: EventLoopProxy<RenderThreadExit>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        if let Err(err) = render_loop(
            window,
            &config,
            &input,
            &surface_size,
            &shutdown,
            &present_lock,
        ) {
            error!("render thread stopped: {err}");
        }
        // Wake the event loop so it can exit if we stopped on our own.
        let _ = proxy.send_event(RenderThreadExit);
    })
}

/// The dedicated render loop: update camera from the latest input, clear,
/// draw the scene, present. Checks the shutdown flag once per iteration and
/// tears the scene down before the thread exits.
fn render_loop(
    window: Arc<Window>,
    config: &WindowConfig,
    input: &InputState,
    surface_size: &SurfaceSize,
    shutdown: &AtomicBool,
    present_lock: &Mutex<()>,
) -> Result<()> {
    let mut renderer = pollster::block_on(Renderer::new(window, config))?;
    let mut scene = SandboxScene::new(
        renderer.gpu(),
        renderer.target_info(),
        config.width,
        config.height,
    )?;

    info!("render loop running");
    let mut timer = FrameTimer::start();
    while !shutdown.load(Ordering::Acquire) {
        let delta = timer.delta();

        let pending = (
            surface_size.width.load(Ordering::Relaxed),
            surface_size.height.load(Ordering::Relaxed),
        );
        if pending != renderer.surface_size() {
            renderer.resize(pending.0, pending.1);
            scene.resize(pending.0, pending.1);
        }

        scene.update(&renderer.gpu().queue, input, delta, timer.run_time());
        let frame = renderer.render_frame(&scene)?;

        {
            let _guard = present_lock
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if !shutdown.load(Ordering::Acquire) {
                frame.present();
            }
        }
    }

    scene.release();
    info!("render loop finished");
    Ok(())
}
