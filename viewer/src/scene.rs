use backboard::{Backboard, Bounce, Hoop, Shot};
use bspline::SampledSurface;
use itertools::Itertools;
use nalgebra_glm::{self as glm, DVec3, Vec3};

use crate::lines::Vertex;

type Color = [f32; 3];

const SURFACE: Color = [0.55, 0.65, 0.85];
const CONTROL: Color = [1.0, 0.85, 0.2];
const RIM: Color = [1.0, 0.4, 0.05];
const SHOT: Color = [0.3, 0.9, 0.4];
const REBOUND: Color = [0.9, 0.3, 0.3];
const NORMAL: Color = [0.85, 0.85, 0.85];
const TANGENT_U: Color = [0.8, 0.35, 0.8];
const TANGENT_V: Color = [0.3, 0.75, 0.8];

/// Points per drawn shot arc
const ARC_POINTS: usize = 48;
const RIM_POINTS: usize = 64;
/// Length of the normal and tangent strokes, in metres
const WHISKER: f64 = 0.05;

/// A flat list of line-segment endpoints, ready for upload.
#[derive(Default)]
pub struct Scene {
    verts: Vec<Vertex>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verts(&self) -> &[Vertex] {
        &self.verts
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.verts.iter().map(|v| Vec3::from(v.position)).collect()
    }

    pub fn segment(&mut self, a: &DVec3, b: &DVec3, color: Color) {
        for p in [a, b] {
            self.verts.push(Vertex {
                position: [p.x as f32, p.y as f32, p.z as f32],
                color,
            });
        }
    }

    pub fn polyline(&mut self, points: &[DVec3], color: Color) {
        for (a, b) in points.iter().tuple_windows() {
            self.segment(a, b, color);
        }
    }

    /// Three axis-aligned strokes through `p`.
    pub fn cross(&mut self, p: &DVec3, size: f64, color: Color) {
        for axis in 0..3 {
            let mut d = DVec3::zeros();
            d[axis] = size / 2.0;
            self.segment(&(p - d), &(p + d), color);
        }
    }

    /// Every lattice cell as its outline plus one diagonal.
    pub fn wireframe(&mut self, surface: &SampledSurface, color: Color) {
        let p = surface.positions();
        for [a, b, c, d] in surface.quads() {
            for (i, j) in [(a, b), (b, c), (c, d), (d, a), (a, c)] {
                self.segment(&p[i], &p[j], color);
            }
        }
    }

    /// A short stroke from each point along its direction. Directions that
    /// vanish are skipped.
    pub fn whiskers(&mut self, points: &[DVec3], dirs: &[DVec3], length: f64, color: Color) {
        for (p, d) in points.iter().zip(dirs) {
            let len = glm::length(d);
            if len > 1e-12 {
                self.segment(p, &(p + d * (length / len)), color);
            }
        }
    }

    /// `+x`, `+y` and `+z` in red, green and blue.
    pub fn axes(&mut self, origin: &DVec3, length: f64) {
        let colors = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        for (axis, color) in colors.into_iter().enumerate() {
            let mut d = DVec3::zeros();
            d[axis] = length;
            self.segment(origin, &(origin + d), color);
        }
    }
}

/// Surface with its normals and tangents, control points, rim, world axes
/// and `shots` sample shots for a board interpolated on an `nu x nv` lattice.
pub fn backboard_scene(
    board: &Backboard,
    nu: usize,
    nv: usize,
    shots: usize,
) -> backboard::Result<Scene> {
    let surface = board.interpolate(nu, nv)?;
    let mut scene = Scene::new();

    scene.wireframe(&surface, SURFACE);
    scene.whiskers(surface.positions(), surface.normals(), WHISKER, NORMAL);
    let (du, dv) = tangents(board, nu, nv)?;
    scene.whiskers(surface.positions(), &du, WHISKER, TANGENT_U);
    scene.whiskers(surface.positions(), &dv, WHISKER, TANGENT_V);
    for p in board.control_points().iter() {
        scene.cross(p, 0.04, CONTROL);
    }
    scene.polyline(&Hoop::rim_arc(RIM_POINTS)?, RIM);
    scene.axes(&DVec3::zeros(), 1.0);

    // Aim shots from the lattice at the middle of the board, and follow each
    // one after the bounce down to rim height.
    let target = (nu / 2, nv / 2);
    let bounce_point = *surface.position(target.0, target.1);
    let normal = *surface.normal(target.0, target.1);
    for shot_point in Backboard::shot_points().into_iter().take(shots) {
        let shot = Shot::new(shot_point, bounce_point)?;
        scene.polyline(&shot.arc(ARC_POINTS)?, SHOT);

        let bounce = Bounce::new(&shot, &normal);
        scene.polyline(&bounce.arc(ARC_POINTS)?, REBOUND);
    }

    log::debug!(
        "scene has {} segments ({nu}x{nv} samples, {shots} shots)",
        scene.verts.len() / 2
    );
    Ok(scene)
}

/// Surface partials at every lattice sample, in the order of
/// [`SampledSurface::positions`].
fn tangents(
    board: &Backboard,
    nu: usize,
    nv: usize,
) -> backboard::Result<(Vec<DVec3>, Vec<DVec3>)> {
    let surface = board.surface();
    let at = |k: usize, n: usize| k as f64 / (n - 1) as f64;
    let mut du = Vec::with_capacity(nu * nv);
    let mut dv = Vec::with_capacity(nu * nv);
    for ku in 0..nu {
        for kv in 0..nv {
            let (a, b) = surface.partials(at(ku, nu), at(kv, nv))?;
            du.push(a);
            dv.push(b);
        }
    }
    Ok((du, dv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives() {
        let mut scene = Scene::new();
        scene.segment(&glm::vec3(0.0, 0.0, 0.0), &glm::vec3(1.0, 2.0, 3.0), RIM);
        assert_eq!(scene.verts().len(), 2);
        assert_eq!(scene.verts()[1].position, [1.0, 2.0, 3.0]);

        let pts: Vec<_> = (0..5).map(|k| glm::vec3(k as f64, 0.0, 0.0)).collect();
        scene.polyline(&pts, RIM);
        assert_eq!(scene.verts().len(), 2 + 2 * 4);

        scene.cross(&glm::vec3(0.0, 0.0, 0.0), 1.0, CONTROL);
        scene.axes(&glm::vec3(0.0, 0.0, 0.0), 1.0);
        assert_eq!(scene.verts().len(), 10 + 6 + 6);
        assert_eq!(scene.verts()[10].position, [-0.5, 0.0, 0.0]);
        assert_eq!(scene.verts()[11].position, [0.5, 0.0, 0.0]);
    }

    #[test]
    fn whiskers_skip_vanishing_directions() {
        let mut scene = Scene::new();
        let points = [glm::vec3(1.0, 0.0, 0.0), glm::vec3(2.0, 0.0, 0.0)];
        let dirs = [glm::vec3(0.0, 0.0, 3.0), DVec3::zeros()];
        scene.whiskers(&points, &dirs, 0.5, NORMAL);
        assert_eq!(scene.verts().len(), 2);
        assert_eq!(scene.verts()[1].position, [1.0, 0.0, 0.5]);
    }

    fn count(scene: &Scene, color: Color) -> usize {
        scene.verts().iter().filter(|v| v.color == color).count() / 2
    }

    #[test]
    fn backboard_segments() {
        let board = Backboard::new(6, 4).unwrap();
        let (nu, nv) = (20, 30);
        let scene = backboard_scene(&board, nu, nv, 3).unwrap();

        assert_eq!(count(&scene, SURFACE), 19 * 29 * 5);
        assert_eq!(count(&scene, CONTROL), 6 * 4 * 3);
        assert_eq!(count(&scene, RIM), RIM_POINTS - 1);
        assert_eq!(count(&scene, SHOT), 3 * (ARC_POINTS - 1));
        assert_eq!(count(&scene, NORMAL), nu * nv);
        // clamped edges flatten one partial, so those strokes are dropped
        assert!(count(&scene, TANGENT_U) <= nu * nv);
        assert!(count(&scene, TANGENT_V) <= nu * nv);
        assert!(count(&scene, TANGENT_U) >= (nu - 2) * nv);
        assert_eq!(scene.positions().len(), scene.verts().len());
    }

    #[test]
    fn rebounds_are_arcs_down_to_the_rim() {
        let board = Backboard::new(6, 4).unwrap();
        let (nu, nv) = (20, 30);
        let scene = backboard_scene(&board, nu, nv, 3).unwrap();

        let surface = board.interpolate(nu, nv).unwrap();
        let target = *surface.position(nu / 2, nv / 2);
        let normal = *surface.normal(nu / 2, nv / 2);
        let crossings: Vec<DVec3> = Backboard::shot_points()
            .into_iter()
            .take(3)
            .filter_map(|p| {
                let shot = Shot::new(p, target).unwrap();
                Bounce::new(&shot, &normal).rim_crossing
            })
            .collect();
        assert!(!crossings.is_empty());
        assert_eq!(count(&scene, REBOUND), crossings.len() * (ARC_POINTS - 1));

        let rebound: Vec<_> = scene.verts().iter().filter(|v| v.color == REBOUND).collect();
        for (k, crossing) in crossings.iter().enumerate() {
            let end = rebound[(k + 1) * 2 * (ARC_POINTS - 1) - 1].position;
            assert!((end[0] - crossing.x as f32).abs() < 1e-5);
            assert!((end[1] - crossing.y as f32).abs() < 1e-5);
            assert!((end[2] - crossing.z as f32).abs() < 1e-5);
        }
    }
}
