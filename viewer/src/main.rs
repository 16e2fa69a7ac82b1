use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent as WinitWindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

pub(crate) mod app;
pub(crate) mod camera;
pub(crate) mod lines;
pub(crate) mod scene;

use crate::app::{App, Reply};
use crate::scene::Scene;
use backboard::{Backboard, Optimizer};

/// Shots drawn from the front of the floor lattice
const SHOTS: usize = 4;
/// Shortest time between two intermediate designs sent to the window
const REFRESH: Duration = Duration::from_millis(100);

struct ViewerApp {
    start: SystemTime,
    scene: Scene,
    window: Option<Arc<Window>>,
    app: Option<App<'static>>,
}

impl ViewerApp {
    fn new(start: SystemTime, scene: Scene) -> Self {
        Self {
            start,
            scene,
            window: None,
            app: None,
        }
    }

    fn reply(&self, event_loop: &ActiveEventLoop, reply: Reply) {
        match reply {
            Reply::Continue => (),
            Reply::Quit => event_loop.exit(),
            Reply::Redraw => {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
        }
    }
}

impl ApplicationHandler<Scene> for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = Arc::new(
                event_loop
                    .create_window(
                        winit::window::WindowAttributes::default().with_title("Backboard"),
                    )
                    .expect("Failed to create window"),
            );

            let size = window.inner_size();
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
            let surface = instance
                .create_surface(window.clone())
                .expect("Failed to create surface");

            let adapter =
                pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                }))
                .expect("Failed to find an appropriate adapter");

            let (device, queue) =
                pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                    trace: Default::default(),
                }))
                .expect("Failed to create device");

            let app = App::new(
                self.start,
                size,
                adapter,
                surface,
                device,
                queue,
                &self.scene,
            );

            self.app = Some(app);
            window.request_redraw();
            self.window = Some(window);
        }
    }

    /// A newer design from the optimizer.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, scene: Scene) {
        if let Some(app) = &mut self.app {
            app.set_scene(&scene);
            self.reply(event_loop, Reply::Redraw);
        }
        self.scene = scene;
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WinitWindowEvent,
    ) {
        let Some(app) = &mut self.app else {
            return;
        };
        if let WinitWindowEvent::RedrawRequested = event {
            app.redraw();
            return;
        }
        let reply = app.window_event(event);
        if let Reply::Quit = reply {
            // drop GPU resources before the window goes away
            self.app = None;
        }
        self.reply(event_loop, reply);
    }

    fn device_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        if let Some(app) = &mut self.app {
            let reply = app.device_event(event);
            self.reply(event_loop, reply);
        }
    }
}

/// Runs `optimizer` on its own thread and sends a scene of the best design
/// so far through `proxy`, at most once per [`REFRESH`] and once at the end.
fn spawn_optimizer(
    optimizer: Optimizer,
    board: Backboard,
    (nu, nv): (usize, usize),
    proxy: EventLoopProxy<Scene>,
) {
    std::thread::spawn(move || {
        let send = move |board: &Backboard| match scene::backboard_scene(board, nu, nv, SHOTS) {
            Ok(scene) => {
                if proxy.send_event(scene).is_err() {
                    log::debug!("window closed, dropping design");
                }
            }
            Err(e) => log::warn!("cannot draw design: {e}"),
        };

        let progress = send.clone();
        let mut last = Instant::now();
        let result = optimizer.optimize_with(&board, move |board| {
            if last.elapsed() >= REFRESH {
                last = Instant::now();
                progress(board);
            }
        });
        match result {
            Ok(done) => {
                log::info!(
                    "optimized in {} iterations: objective {:.6} -> {:.6}",
                    done.iterations,
                    done.initial_objective,
                    done.objective
                );
                send(&done.board);
            }
            Err(e) => log::error!("optimization failed: {e}"),
        }
    });
}

/// Parses `NxM` into a pair of counts.
fn parse_grid(s: &str) -> Option<(usize, usize)> {
    let (a, b) = s.split_once(['x', 'X'])?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn main() {
    let start = SystemTime::now();
    env_logger::init();

    let matches = clap::App::new("viewer")
        .about("Shows the interpolated backboard surface with a few shots")
        .arg(
            clap::Arg::with_name("samples-u")
                .long("samples-u")
                .takes_value(true)
                .default_value("20")
                .help("Surface samples across the board"),
        )
        .arg(
            clap::Arg::with_name("samples-v")
                .long("samples-v")
                .takes_value(true)
                .default_value("30")
                .help("Surface samples from top to bottom"),
        )
        .arg(
            clap::Arg::with_name("control-grid")
                .long("control-grid")
                .takes_value(true)
                .default_value("6x4")
                .help("Control points, as NXxNY"),
        )
        .arg(
            clap::Arg::with_name("no-optimize")
                .long("no-optimize")
                .help("Only show the starting board"),
        )
        .arg(
            clap::Arg::with_name("max-iters")
                .long("max-iters")
                .takes_value(true)
                .default_value("5000")
                .help("Nelder-Mead iteration limit"),
        )
        .get_matches();

    let count = |name: &str| -> usize {
        let value = matches.value_of(name).unwrap_or_default();
        value.parse().unwrap_or_else(|_| {
            eprintln!("Error: --{name} expects a count, got {value:?}");
            std::process::exit(2);
        })
    };
    let nu = count("samples-u");
    let nv = count("samples-v");
    let grid = matches.value_of("control-grid").unwrap_or_default();
    let Some((nx, ny)) = parse_grid(grid) else {
        eprintln!("Error: --control-grid expects NXxNY, got {grid:?}");
        std::process::exit(2);
    };

    let max_iters = count("max-iters") as u64;

    let built = Backboard::new(nx, ny)
        .and_then(|board| Ok((scene::backboard_scene(&board, nu, nv, SHOTS)?, board)));
    let (scene, board) = match built {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    log::info!(
        "built {}x{} board sampled at {nu}x{nv}: {} segments",
        nx,
        ny,
        scene.verts().len() / 2
    );

    let event_loop = EventLoop::<Scene>::with_user_event()
        .build()
        .expect("Failed to create event loop");
    if !matches.is_present("no-optimize") {
        let optimizer = Optimizer {
            max_iters,
            ..Optimizer::default()
        };
        spawn_optimizer(optimizer, board, (nu, nv), event_loop.create_proxy());
    }
    let mut app = ViewerApp::new(start, scene);
    if let Err(e) = event_loop.run_app(&mut app) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
