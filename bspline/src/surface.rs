use nalgebra_glm::{self as glm, DVec3};

use crate::{
    basis, ControlGrid, Error, Point, Result, SampledSurface, Span, SurfaceSpan,
};

/// Parameter offset used to step off a clamped edge when a partial
/// derivative vanishes there.
const EDGE_NUDGE: f64 = 1e-4;

/// Tensor-product uniform cubic B-spline surface, clamped on all four edges.
///
/// `u` runs along the rows of the control grid and `v` along its columns.
#[derive(Clone, Debug)]
pub struct ClampedCubicSurface<const D: usize> {
    grid: ControlGrid<D>,
    padded: ControlGrid<D>,
    /// Largest distance of any control point from the first one.
    extent: f64,
}

impl<const D: usize> ClampedCubicSurface<D> {
    pub fn new(grid: ControlGrid<D>) -> Self {
        let padded = grid.padded();
        log::debug!(
            "clamped cubic surface: {}x{} control points, {}x{} patches",
            grid.rows(),
            grid.cols(),
            padded.rows() - 3,
            padded.cols() - 3
        );
        let origin = grid[(0, 0)];
        let extent = grid
            .iter()
            .map(|p| (p - origin).norm())
            .fold(f64::MIN_POSITIVE, f64::max);
        Self {
            grid,
            padded,
            extent,
        }
    }

    pub fn control_grid(&self) -> &ControlGrid<D> {
        &self.grid
    }

    fn locate(&self, u: f64, v: f64) -> Result<SurfaceSpan> {
        Ok(SurfaceSpan {
            u: Span::locate_named("u", u, self.padded.rows())?,
            v: Span::locate_named("v", v, self.padded.cols())?,
        })
    }

    /// Sums `wu[i] * wv[j] * P[i][j]` over the 4x4 window of `span`.
    fn tensor(&self, span: &SurfaceSpan, wu: &[f64; 4], wv: &[f64; 4]) -> Point<D> {
        let mut out = Point::<D>::zeros();
        for (i, row) in span.u.window().enumerate() {
            for (j, col) in span.v.window().enumerate() {
                out += self.padded[(row, col)] * (wu[i] * wv[j]);
            }
        }
        out
    }

    pub fn point(&self, u: f64, v: f64) -> Result<Point<D>> {
        self.point_with_span(u, v).map(|(p, _)| p)
    }

    /// Evaluates the surface and also reports the intervals used along each
    /// direction.
    pub fn point_with_span(&self, u: f64, v: f64) -> Result<(Point<D>, SurfaceSpan)> {
        let span = self.locate(u, v)?;
        let wu = basis::weights(span.u.u)?;
        let wv = basis::weights(span.v.u)?;
        Ok((self.tensor(&span, &wu, &wv), span))
    }

    /// Partial derivatives `(∂/∂u, ∂/∂v)`.
    pub fn partials(&self, u: f64, v: f64) -> Result<(Point<D>, Point<D>)> {
        let span = self.locate(u, v)?;
        let wu = basis::weights(span.u.u)?;
        let wv = basis::weights(span.v.u)?;
        let du = basis::derivative_weights(span.u.u)?;
        let dv = basis::derivative_weights(span.v.u)?;
        let scale_u = (self.padded.rows() - 3) as f64;
        let scale_v = (self.padded.cols() - 3) as f64;
        Ok((
            self.tensor(&span, &du, &wv) * scale_u,
            self.tensor(&span, &wu, &dv) * scale_v,
        ))
    }

    /// Samples positions on an `nu x nv` lattice covering `[0, 1]²`,
    /// row-major with `u` as the slow index.
    pub fn sample_points(&self, nu: usize, nv: usize) -> Result<Vec<Point<D>>> {
        check_samples(nu, nv)?;
        let mut out = Vec::with_capacity(nu * nv);
        for ku in 0..nu {
            for kv in 0..nv {
                out.push(self.point(lattice(ku, nu), lattice(kv, nv))?);
            }
        }
        Ok(out)
    }
}

impl ClampedCubicSurface<3> {
    /// Unit surface normal `∂u × ∂v`.
    ///
    /// Clamping flattens the surface along its edges, so one partial vanishes
    /// there; in that case the normal is taken a small step inside the
    /// domain. A surface that is degenerate even there yields a zero vector.
    pub fn normal(&self, u: f64, v: f64) -> Result<DVec3> {
        if let Some(n) = self.raw_normal(u, v)? {
            return Ok(n);
        }
        let inside = |s: f64| s.clamp(EDGE_NUDGE, 1.0 - EDGE_NUDGE);
        match self.raw_normal(inside(u), inside(v))? {
            Some(n) => Ok(n),
            None => {
                log::warn!("degenerate normal at ({u}, {v})");
                Ok(DVec3::zeros())
            }
        }
    }

    fn raw_normal(&self, u: f64, v: f64) -> Result<Option<DVec3>> {
        let (du, dv) = self.partials(u, v)?;
        let tol = 1e-9 * self.extent;
        let (lu, lv) = (glm::length(&du), glm::length(&dv));
        if lu <= tol || lv <= tol {
            return Ok(None);
        }
        let n = glm::cross(&(du / lu), &(dv / lv));
        let len = glm::length(&n);
        Ok((len > 1e-6).then(|| n / len))
    }

    /// Positions and normals on an `nu x nv` lattice.
    pub fn sample(&self, nu: usize, nv: usize) -> Result<SampledSurface> {
        check_samples(nu, nv)?;
        let mut positions = Vec::with_capacity(nu * nv);
        let mut normals = Vec::with_capacity(nu * nv);
        for ku in 0..nu {
            let u = lattice(ku, nu);
            for kv in 0..nv {
                let v = lattice(kv, nv);
                positions.push(self.point(u, v)?);
                normals.push(self.normal(u, v)?);
            }
        }
        Ok(SampledSurface::new(nu, nv, positions, normals))
    }
}

fn lattice(k: usize, n: usize) -> f64 {
    k as f64 / (n - 1) as f64
}

fn check_samples(nu: usize, nv: usize) -> Result<()> {
    match (nu, nv) {
        (nu, _) if nu < 2 => Err(Error::TooFewSamples { count: nu }),
        (_, nv) if nv < 2 => Err(Error::TooFewSamples { count: nv }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn bowl() -> ClampedCubicSurface<3> {
        let grid = ControlGrid::from_fn(5, 6, |i, j| {
            let x = i as f64 - 2.0;
            let y = j as f64 - 2.5;
            glm::vec3(x, y, 0.4 * (x * x + 2.0 * y * y))
        })
        .unwrap();
        ClampedCubicSurface::new(grid)
    }

    #[test]
    fn span_diagnostics() {
        let s = bowl();
        let (_, span) = s.point_with_span(1.0, 0.0).unwrap();
        assert_eq!(span.u, Span { interval: 8, u: 1.0 });
        assert_eq!(span.v, Span { interval: 3, u: 0.0 });
    }

    #[test]
    fn names_the_bad_parameter() {
        let s = bowl();
        assert_eq!(
            s.point(0.5, 1.25),
            Err(Error::ParameterOutOfRange {
                name: "v",
                value: 1.25
            })
        );
        assert!(matches!(
            s.point(-1.0, 0.5),
            Err(Error::ParameterOutOfRange { name: "u", .. })
        ));
    }

    #[test]
    fn partials_match_finite_difference() {
        let s = bowl();
        let h = 1e-6;
        for (u, v) in [(0.3, 0.6), (0.55, 0.21), (0.8, 0.9)] {
            let (du, dv) = s.partials(u, v).unwrap();
            let fu = (s.point(u + h, v).unwrap() - s.point(u - h, v).unwrap()) / (2.0 * h);
            let fv = (s.point(u, v + h).unwrap() - s.point(u, v - h).unwrap()) / (2.0 * h);
            assert_abs_diff_eq!(du, fu, epsilon = 1e-4);
            assert_abs_diff_eq!(dv, fv, epsilon = 1e-4);
        }
    }

    #[test]
    fn normals_are_unit_and_point_up_in_a_bowl() {
        let s = bowl();
        for (u, v) in [(0.5, 0.5), (0.0, 0.0), (1.0, 0.3), (0.2, 1.0)] {
            let n = s.normal(u, v).unwrap();
            assert_abs_diff_eq!(glm::length(&n), 1.0, epsilon = 1e-9);
            assert!(n.z > 0.0, "normal at ({u}, {v}) = {n:?}");
        }
    }

    /// Keeps every record logged at `warn!` or above.
    struct Warnings(std::sync::Mutex<Vec<String>>);

    impl log::Log for Warnings {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                if let Ok(mut seen) = self.0.lock() {
                    seen.push(record.args().to_string());
                }
            }
        }

        fn flush(&self) {}
    }

    static WARNINGS: Warnings = Warnings(std::sync::Mutex::new(Vec::new()));

    #[test]
    fn collapsed_grid_warns_and_has_zero_normal() {
        // only this test installs a logger in this binary
        log::set_logger(&WARNINGS).unwrap();
        log::set_max_level(log::LevelFilter::Warn);

        let grid = ControlGrid::from_fn(4, 4, |_, _| glm::vec3(1.0, 2.0, 3.0)).unwrap();
        let s = ClampedCubicSurface::new(grid);
        assert_eq!(s.normal(0.5, 0.5).unwrap(), DVec3::zeros());

        let seen = WARNINGS.0.lock().unwrap();
        assert!(
            seen.iter().any(|m| m.starts_with("degenerate normal at (0.5, 0.5)")),
            "{seen:?}"
        );
    }

    #[test]
    fn sample_shape() {
        let s = bowl();
        let sampled = s.sample(7, 9).unwrap();
        assert_eq!((sampled.nu(), sampled.nv()), (7, 9));
        assert_abs_diff_eq!(*sampled.position(6, 8), s.control_grid()[(4, 5)], epsilon = 1e-12);
        assert_eq!(s.sample_points(3, 3).unwrap().len(), 9);
        assert_eq!(s.sample(1, 5).unwrap_err(), Error::TooFewSamples { count: 1 });
        assert_eq!(s.sample_points(5, 0).unwrap_err(), Error::TooFewSamples { count: 0 });
    }
}
