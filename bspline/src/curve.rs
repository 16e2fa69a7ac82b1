use crate::{
    basis::{self, combine},
    ControlPolygon, Error, Point, Result, Span,
};

/// A uniform cubic B-spline curve clamped to its end points.
#[derive(Clone, Debug)]
pub struct ClampedCubicCurve<const D: usize> {
    polygon: ControlPolygon<D>,
    padded: Vec<Point<D>>,
}

impl<const D: usize> ClampedCubicCurve<D> {
    pub fn new(polygon: ControlPolygon<D>) -> Self {
        let padded = polygon.padded();
        log::debug!(
            "clamped cubic curve: {} control points, {} segments",
            polygon.len(),
            padded.len() - 3
        );
        Self { polygon, padded }
    }

    pub fn control_polygon(&self) -> &ControlPolygon<D> {
        &self.polygon
    }

    /// Number of polynomial segments.
    pub fn segments(&self) -> usize {
        self.padded.len() - 3
    }

    pub fn point(&self, s: f64) -> Result<Point<D>> {
        self.point_with_span(s).map(|(p, _)| p)
    }

    /// Evaluates the curve and also reports which interval was used.
    pub fn point_with_span(&self, s: f64) -> Result<(Point<D>, Span)> {
        let span = Span::locate(s, self.padded.len())?;
        let w = basis::weights(span.u)?;
        Ok((combine(&w, &self.padded[span.window()]), span))
    }

    /// Derivative with respect to `s`.
    pub fn tangent(&self, s: f64) -> Result<Point<D>> {
        let span = Span::locate(s, self.padded.len())?;
        let w = basis::derivative_weights(span.u)?;
        Ok(combine(&w, &self.padded[span.window()]) * self.segments() as f64)
    }

    /// `count` points at evenly spaced parameters, both ends included.
    pub fn sample(&self, count: usize) -> Result<Vec<Point<D>>> {
        if count < 2 {
            return Err(Error::TooFewSamples { count });
        }
        (0..count)
            .map(|k| self.point(k as f64 / (count - 1) as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra_glm as glm;

    fn line(n: usize) -> ClampedCubicCurve<2> {
        let ps = (0..n).map(|i| glm::vec2(i as f64, 2.0 * i as f64)).collect();
        ClampedCubicCurve::new(ControlPolygon::new(ps).unwrap())
    }

    #[test]
    fn collinear_points_stay_on_the_line() {
        let curve = line(6);
        for p in curve.sample(101).unwrap() {
            assert_abs_diff_eq!(p.y, 2.0 * p.x, epsilon = 1e-12);
            assert!(p.x >= -1e-12 && p.x <= 5.0 + 1e-12);
        }
    }

    #[test]
    fn span_diagnostics() {
        let curve = line(4);
        assert_eq!(curve.segments(), 5);
        let (_, span) = curve.point_with_span(0.0).unwrap();
        assert_eq!(span, Span { interval: 3, u: 0.0 });
        let (_, span) = curve.point_with_span(1.0).unwrap();
        assert_eq!(span, Span { interval: 7, u: 1.0 });
    }

    #[test]
    fn tangent_matches_finite_difference() {
        let ps = vec![
            glm::vec2(0.0, 0.0),
            glm::vec2(1.0, 3.0),
            glm::vec2(2.0, -1.0),
            glm::vec2(4.0, 0.5),
            glm::vec2(5.0, 2.0),
        ];
        let curve = ClampedCubicCurve::new(ControlPolygon::new(ps).unwrap());
        let h = 1e-6;
        for s in [0.13, 0.4, 0.77] {
            let fd = (curve.point(s + h).unwrap() - curve.point(s - h).unwrap()) / (2.0 * h);
            assert_abs_diff_eq!(curve.tangent(s).unwrap(), fd, epsilon = 1e-5);
        }
    }

    #[test]
    fn clamped_ends_have_zero_tangent() {
        let curve = line(5);
        assert_abs_diff_eq!(curve.tangent(0.0).unwrap(), glm::vec2(0.0, 0.0));
        assert_abs_diff_eq!(curve.tangent(1.0).unwrap(), glm::vec2(0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn sample_needs_two_points() {
        assert_eq!(line(4).sample(1), Err(Error::TooFewSamples { count: 1 }));
        assert_eq!(line(4).sample(2).unwrap().len(), 2);
    }
}
