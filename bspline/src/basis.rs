//! Uniform cubic B-spline blending functions.
//!
//! On each knot interval the curve is a weighted sum of four consecutive
//! control points. With the local parameter `u` in `[0, 1]` the weights are
//!
//! ```text
//! b0 = (1 - u)³ / 6
//! b1 = (3u³ - 6u² + 4) / 6
//! b2 = (-3u³ + 3u² + 3u + 1) / 6
//! b3 = u³ / 6
//! ```
use crate::{Error, Point, Result};

/// Rejects anything outside `[0, 1]`, including NaN.
pub(crate) fn check_unit(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::ParameterOutOfRange { name, value })
    }
}

/// Blending weights of the four control points of one interval.
pub fn weights(u: f64) -> Result<[f64; 4]> {
    check_unit("u", u)?;
    let u2 = u * u;
    let u3 = u2 * u;
    let w = 1.0 - u;
    Ok([
        w * w * w / 6.0,
        (3.0 * u3 - 6.0 * u2 + 4.0) / 6.0,
        (-3.0 * u3 + 3.0 * u2 + 3.0 * u + 1.0) / 6.0,
        u3 / 6.0,
    ])
}

/// First derivative of [`weights`] with respect to the local parameter.
pub fn derivative_weights(u: f64) -> Result<[f64; 4]> {
    check_unit("u", u)?;
    let u2 = u * u;
    let w = 1.0 - u;
    Ok([
        -3.0 * w * w / 6.0,
        (9.0 * u2 - 12.0 * u) / 6.0,
        (-9.0 * u2 + 6.0 * u + 3.0) / 6.0,
        3.0 * u2 / 6.0,
    ])
}

/// Evaluates one cubic segment from its four control points.
pub fn blend<const D: usize>(u: f64, ps: &[Point<D>; 4]) -> Result<Point<D>> {
    Ok(combine(&weights(u)?, ps))
}

pub(crate) fn combine<const D: usize>(w: &[f64; 4], ps: &[Point<D>]) -> Point<D> {
    debug_assert_eq!(ps.len(), 4);
    w.iter()
        .zip(ps)
        .fold(Point::<D>::zeros(), |acc, (w, p)| acc + p * *w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra_glm as glm;

    #[test]
    fn partition_of_unity() {
        for k in 0..=1000 {
            let u = k as f64 / 1000.0;
            let sum: f64 = weights(u).unwrap().iter().sum();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn derivative_weights_sum_to_zero() {
        for k in 0..=1000 {
            let u = k as f64 / 1000.0;
            let sum: f64 = derivative_weights(u).unwrap().iter().sum();
            assert_abs_diff_eq!(sum, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let h = 1e-6;
        for u in [0.1, 0.25, 0.5, 0.9] {
            let lo = weights(u - h).unwrap();
            let hi = weights(u + h).unwrap();
            let d = derivative_weights(u).unwrap();
            for i in 0..4 {
                assert_abs_diff_eq!((hi[i] - lo[i]) / (2.0 * h), d[i], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn weights_at_ends() {
        let w0 = weights(0.0).unwrap();
        assert_abs_diff_eq!(w0[0], 1.0 / 6.0);
        assert_abs_diff_eq!(w0[1], 4.0 / 6.0);
        assert_abs_diff_eq!(w0[2], 1.0 / 6.0);
        assert_abs_diff_eq!(w0[3], 0.0);

        let w1 = weights(1.0).unwrap();
        assert_abs_diff_eq!(w1[0], 0.0);
        assert_abs_diff_eq!(w1[1], 1.0 / 6.0);
        assert_abs_diff_eq!(w1[2], 4.0 / 6.0);
        assert_abs_diff_eq!(w1[3], 1.0 / 6.0);
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(matches!(
            weights(-0.01),
            Err(Error::ParameterOutOfRange { name: "u", .. })
        ));
        assert!(weights(1.0 + 1e-9).is_err());
        assert!(weights(f64::NAN).is_err());
        assert!(derivative_weights(2.0).is_err());
    }

    #[test]
    fn blend_of_equal_points_is_that_point() {
        let p = glm::vec3(1.0, -2.0, 0.5);
        let q = blend(0.3, &[p, p, p, p]).unwrap();
        assert_abs_diff_eq!(q, p, epsilon = 1e-12);
    }
}
