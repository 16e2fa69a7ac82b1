use glm::Vec2;
use nalgebra_glm as glm;
use winit::{
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, MouseScrollDelta, WindowEvent},
    keyboard::{Key, ModifiersState},
};

use crate::{camera::Camera, lines::Lines, scene::Scene};

/// Trackpad pixels per wheel notch
const PIXELS_PER_NOTCH: f32 = 50.0;

/// Owns every GPU resource for one window.
pub struct App<'a> {
    start_time: std::time::SystemTime,

    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    lines: Lines,
    camera: Camera,

    depth: (wgpu::Texture, wgpu::TextureView),

    modifiers: ModifiersState,

    first_frame: bool,
}

pub enum Reply {
    Continue,
    Redraw,
    Quit,
}

impl<'a> App<'a> {
    pub fn new(
        start_time: std::time::SystemTime,
        size: PhysicalSize<u32>,
        adapter: wgpu::Adapter,
        surface: wgpu::Surface<'a>,
        device: wgpu::Device,
        queue: wgpu::Queue,
        scene: &Scene,
    ) -> Self {
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth = Self::rebuild_depth_(size, &device);
        let lines = Lines::new(&device, surface_format, scene.verts());

        let mut camera = Camera::new(size.width as f32, size.height as f32);
        camera.fit_verts(&scene.positions());

        Self {
            start_time,

            depth,
            config,
            lines,
            camera,
            surface,
            device,
            queue,

            modifiers: ModifiersState::empty(),

            first_frame: true,
        }
    }

    /// Swaps in a new scene without moving the camera.
    pub fn set_scene(&mut self, scene: &Scene) {
        self.lines.upload(&self.device, scene.verts());
    }

    pub fn device_event(&mut self, e: DeviceEvent) -> Reply {
        if let DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::PixelDelta(p),
        } = e
        {
            self.camera.mouse_scroll(p.y as f32 / PIXELS_PER_NOTCH);
            Reply::Redraw
        } else {
            Reply::Continue
        }
    }

    pub fn window_event(&mut self, e: WindowEvent) -> Reply {
        match e {
            WindowEvent::Resized(size) => {
                self.resize(size);
                Reply::Redraw
            }
            WindowEvent::CloseRequested => Reply::Quit,
            WindowEvent::ModifiersChanged(m) => {
                self.modifiers = m.state();
                Reply::Continue
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let command = self.modifiers.super_key() || self.modifiers.control_key();
                if command && event.logical_key == Key::Character("q".into()) {
                    Reply::Quit
                } else {
                    Reply::Continue
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                use ElementState::*;
                match state {
                    Pressed => self.camera.mouse_pressed(button),
                    Released => {
                        self.camera.mouse_released(button);
                        log::debug!(
                            "view at azimuth {:.1}, elevation {:.1}, distance {:.3}",
                            self.camera.azimuth(),
                            self.camera.elevation(),
                            self.camera.distance()
                        );
                    }
                }
                Reply::Continue
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pos = Vec2::new(position.x as f32, position.y as f32);
                if self.camera.mouse_move(pos) {
                    Reply::Redraw
                } else {
                    Reply::Continue
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let MouseScrollDelta::LineDelta(_, verti) = delta {
                    self.camera.mouse_scroll(verti);
                }
                Reply::Redraw
            }
            _ => Reply::Continue,
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width > 0 && size.height > 0 {
            self.config.width = size.width;
            self.config.height = size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth = Self::rebuild_depth_(size, &self.device);
            self.camera.set_size(size.width as f32, size.height as f32);
        }
    }

    fn rebuild_depth_(
        size: PhysicalSize<u32>,
        device: &wgpu::Device,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let size = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some("depth tex"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        };
        let tex = device.create_texture(&desc);
        let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
        (tex, view)
    }

    pub fn redraw(&mut self) {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::warn!("skipping frame: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        self.lines.draw(
            &self.camera,
            &self.queue,
            &view,
            &self.depth.1,
            &mut encoder,
        );
        self.queue.submit(Some(encoder.finish()));
        output.present();

        if self.first_frame {
            if let Ok(dt) = self.start_time.elapsed() {
                log::info!("first redraw at {dt:?}");
            }
            self.first_frame = false;
        }
    }
}
