use bspline::{ClampedSurface3, ControlGrid, SampledSurface};
use nalgebra_glm::{self as glm, DVec3};

use crate::{Bounce, Error, Hoop, Result, Shot};

/// One shot from the floor onto a point of the backboard.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub shot: Shot,
    pub bounce: Bounce,
}

/// A backboard shaped by a grid of control points.
///
/// Grid rows run across the board (`x`) and columns run from its top edge
/// down to the bottom edge (`z`). The `y` component of each control point is
/// the free design variable; `x` and `z` stay on the regular layout.
#[derive(Clone, Debug)]
pub struct Backboard {
    grid: ControlGrid<3>,
}

impl Backboard {
    /// 6 feet
    pub const WIDTH: f64 = 1.83;
    /// 3.5 feet
    pub const HEIGHT: f64 = 1.07;
    /// Bottom edge sits 12 inches above the rim.
    pub const BOTTOM: f64 = Hoop::RIM_HEIGHT + 0.305;

    /// Default wavy board with `nx x ny` control points.
    pub fn new(nx: usize, ny: usize) -> Result<Self> {
        let grid = ControlGrid::from_fn(nx, ny, |kx, ky| {
            let su = kx as f64 / (nx - 1) as f64;
            let sv = ky as f64 / (ny - 1) as f64;
            let (su_, sv_) = (2.0 * su - 1.0, 2.0 * sv - 1.0);

            let x = 0.5 * Self::WIDTH * su_;
            let z = -Self::BOTTOM - (1.0 - sv) * Self::HEIGHT;
            let y = 0.3 * su_ * su_
                + 0.01 * sv_ * sv_
                + 0.5 * (3.0 * su_).sin() * (5.0 * sv_).cos();
            glm::vec3(x, y, z)
        })?;
        Ok(Self { grid })
    }

    pub fn from_grid(grid: ControlGrid<3>) -> Self {
        Self { grid }
    }

    pub fn control_points(&self) -> &ControlGrid<3> {
        &self.grid
    }

    /// The `y` component of every control point, row-major.
    pub fn design_variables(&self) -> Vec<f64> {
        self.grid.iter().map(|p| p.y).collect()
    }

    /// A copy of this board with every control point's `y` replaced.
    pub fn with_design_variables(&self, dvs: &[f64]) -> Result<Self> {
        let expected = self.grid.rows() * self.grid.cols();
        if dvs.len() != expected {
            return Err(bspline::Error::ShapeMismatch {
                expected,
                actual: dvs.len(),
            }
            .into());
        }
        let points = self
            .grid
            .iter()
            .zip(dvs)
            .map(|(p, &y)| glm::vec3(p.x, y, p.z))
            .collect();
        let grid = ControlGrid::from_flat(self.grid.rows(), self.grid.cols(), points)?;
        Ok(Self { grid })
    }

    pub fn surface(&self) -> ClampedSurface3 {
        ClampedSurface3::new(self.grid.clone())
    }

    pub fn interpolate(&self, nu: usize, nv: usize) -> Result<SampledSurface> {
        Ok(self.surface().sample(nu, nv)?)
    }

    /// Shot points on a 5x4 lattice of the floor in front of the board.
    pub fn shot_points() -> Vec<DVec3> {
        const NX: usize = 5;
        const NY: usize = 4;
        let mut out = Vec::with_capacity(NX * NY);
        for kx in 0..NX {
            let sx = kx as f64 / (NX - 1) as f64;
            for ky in 0..NY {
                let sy = ky as f64 / (NY - 1) as f64;
                out.push(glm::vec3(1.5 * (2.0 * sx - 1.0), 3.0 + 2.0 * sy, 0.0));
            }
        }
        out
    }

    /// Every shot point aimed at every interior sample of the board.
    pub fn compute_shots(&self, nu: usize, nv: usize) -> Result<Vec<Sample>> {
        let surface = self.interpolate(nu, nv)?;
        let mut out = Vec::new();
        for shot_point in Self::shot_points() {
            for ku in 1..nu.saturating_sub(1) {
                for kv in 1..nv.saturating_sub(1) {
                    let shot = Shot::new(shot_point, *surface.position(ku, kv))?;
                    let bounce = Bounce::new(&shot, surface.normal(ku, kv));
                    out.push(Sample { shot, bounce });
                }
            }
        }
        log::debug!("computed {} shots on a {nu}x{nv} board sampling", out.len());
        Ok(out)
    }

    /// Sum of squared horizontal miss distances at rim height.
    pub fn objective(&self, nu: usize, nv: usize) -> Result<f64> {
        let mut total = 0.0;
        for sample in self.compute_shots(nu, nv)? {
            let d = sample
                .bounce
                .xy_distance_from_hoop()
                .ok_or(Error::BounceBelowRim(sample.bounce.point))?;
            total += d * d;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_shape() {
        let board = Backboard::new(6, 4).unwrap();
        let grid = board.control_points();
        assert_eq!((grid.rows(), grid.cols()), (6, 4));

        let [c00, _, _, c11] = grid.corners();
        assert_abs_diff_eq!(c00.x, -0.5 * Backboard::WIDTH);
        assert_abs_diff_eq!(c00.z, -Backboard::BOTTOM - Backboard::HEIGHT);
        assert_abs_diff_eq!(c11.x, 0.5 * Backboard::WIDTH);
        assert_abs_diff_eq!(c11.z, -Backboard::BOTTOM);
    }

    #[test]
    fn too_small_board() {
        assert!(matches!(
            Backboard::new(3, 6),
            Err(Error::Spline(bspline::Error::GridTooSmall { rows: 3, cols: 6 }))
        ));
    }

    #[test]
    fn design_variables_replace_depth_only() {
        let board = Backboard::new(5, 4).unwrap();
        let dvs = board.design_variables();
        assert_eq!(dvs.len(), 20);

        let flat = vec![0.25; 20];
        let moved = board.with_design_variables(&flat).unwrap();
        assert_eq!(moved.design_variables(), flat);
        for (a, b) in board.control_points().iter().zip(moved.control_points().iter()) {
            assert_eq!((a.x, a.z), (b.x, b.z));
        }

        let back = moved.with_design_variables(&dvs).unwrap();
        assert_eq!(back.control_points(), board.control_points());

        assert_eq!(
            board.with_design_variables(&[0.0; 3]).unwrap_err(),
            Error::Spline(bspline::Error::ShapeMismatch {
                expected: 20,
                actual: 3
            })
        );
    }

    #[test]
    fn shot_lattice() {
        let points = Backboard::shot_points();
        assert_eq!(points.len(), 20);
        assert_eq!(points[0], glm::vec3(-1.5, 3.0, 0.0));
        assert_eq!(points[19], glm::vec3(1.5, 5.0, 0.0));
    }
}
