use nalgebra_glm as glm;
use nalgebra_glm::{Mat4, Vec2, Vec3};
use winit::event::MouseButton;

/// Orbit camera looking at a focus point.
///
/// Angles are in degrees. Azimuth is measured in the `x-y` plane from `+x`,
/// elevation out of that plane. `-z` is up on screen.
pub struct Camera {
    width: f32,
    height: f32,

    focus: Vec3,
    azimuth: f32,
    elevation: f32,
    distance: f32,

    dragging: bool,
    cursor: Vec2,
}

impl Camera {
    pub const DEGREES_PER_PIXEL: f32 = 0.5;
    pub const ZOOM_STEP: f32 = 1.1;
    pub const MIN_DISTANCE: f32 = 1e-3;
    pub const MAX_DISTANCE: f32 = 1e3;
    pub const MAX_ELEVATION: f32 = 89.0;
    /// Vertical field of view, in degrees
    pub const FOV: f32 = 45.0;

    pub fn new(width: f32, height: f32) -> Self {
        Camera {
            width,
            height,
            focus: Vec3::zeros(),
            azimuth: -50.0,
            elevation: 20.0,
            distance: 5.0,
            dragging: false,
            cursor: Vec2::zeros(),
        }
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Centers the camera on a bounding sphere and backs off until it fits.
    pub fn fit(&mut self, center: Vec3, radius: f32) {
        self.focus = center;
        let half = (Self::FOV / 2.0).to_radians();
        self.distance = (1.2 * radius / half.sin()).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    pub fn fit_verts(&mut self, verts: &[Vec3]) {
        if verts.is_empty() {
            return;
        }
        let (lo, hi) = verts.iter().fold(
            (verts[0], verts[0]),
            |(lo, hi), v| (glm::min2(&lo, v), glm::max2(&hi, v)),
        );
        let center = (lo + hi) / 2.0;
        let radius = verts
            .iter()
            .map(|v| glm::distance(v, &center))
            .fold(0.0, f32::max);
        self.fit(center, radius);
    }

    pub fn rotate(&mut self, delta: Vec2) {
        self.azimuth = wrap_degrees(self.azimuth + Self::DEGREES_PER_PIXEL * delta.x);
        self.elevation = (self.elevation + Self::DEGREES_PER_PIXEL * delta.y)
            .clamp(-Self::MAX_ELEVATION, Self::MAX_ELEVATION);
        log::debug!(
            "azimuth {:.3} deg, elevation {:.3} deg",
            self.azimuth,
            self.elevation
        );
    }

    /// Positive `notches` move towards the focus point.
    pub fn zoom(&mut self, notches: f32) {
        self.distance = (self.distance / Self::ZOOM_STEP.powf(notches))
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
        log::debug!("distance {:.4}", self.distance);
    }

    pub fn mouse_pressed(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            self.dragging = true;
        }
    }

    pub fn mouse_released(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            self.dragging = false;
        }
    }

    /// Returns true if the view changed.
    pub fn mouse_move(&mut self, pos: Vec2) -> bool {
        let prev = std::mem::replace(&mut self.cursor, pos);
        if self.dragging {
            self.rotate(pos - prev);
        }
        self.dragging
    }

    pub fn mouse_scroll(&mut self, notches: f32) {
        self.zoom(notches);
    }

    pub fn eye(&self) -> Vec3 {
        let (az, el) = (self.azimuth.to_radians(), self.elevation.to_radians());
        let dir = Vec3::new(az.cos() * el.cos(), az.sin() * el.cos(), el.sin());
        self.focus - dir * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        glm::look_at_rh(&self.eye(), &self.focus, &Vec3::new(0.0, 0.0, -1.0))
    }

    /// Perspective projection with a `[0, 1]` depth range.
    pub fn proj_matrix(&self) -> Mat4 {
        let aspect = self.width / self.height.max(1.0);
        glm::perspective_rh_zo(
            aspect,
            Self::FOV.to_radians(),
            self.distance * 1e-2,
            self.distance * 1e2,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj_matrix() * self.view_matrix()
    }
}

/// Wraps an angle into `(-180, 180]`.
fn wrap_degrees(a: f32) -> f32 {
    180.0 - (180.0 - a).rem_euclid(360.0)
}
