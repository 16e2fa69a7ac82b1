use std::ops::Range;

use crate::{basis::check_unit, Error, Result, MIN_CONTROL_POINTS};

/// Where a global parameter lands on a control sequence.
///
/// `interval` indexes the last of the four control points that are blended,
/// so the active window is `interval - 3 ..= interval`. `u` is the local
/// parameter inside that window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub interval: usize,
    pub u: f64,
}

/// A [`Span`] for each parametric direction of a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSpan {
    pub u: Span,
    pub v: Span,
}

impl Span {
    /// Maps `s` in `[0, 1]` onto a sequence of `n` control points.
    ///
    /// The global parameter `t = 3 + s (n - 3)` runs from 3 to `n`. The
    /// right endpoint `t == n` would select a window past the end of the
    /// sequence, so it is folded back onto the last interval with `u = 1`.
    pub fn locate(s: f64, n: usize) -> Result<Self> {
        Self::locate_named("s", s, n)
    }

    pub(crate) fn locate_named(name: &'static str, s: f64, n: usize) -> Result<Self> {
        check_unit(name, s)?;
        if n < MIN_CONTROL_POINTS {
            return Err(Error::TooFewControlPoints { count: n });
        }

        let t = 3.0 + s * (n - 3) as f64;
        let mut interval = t.floor() as usize;
        let mut u = t - interval as f64;
        if interval >= n {
            interval = n - 1;
            u = 1.0;
        }
        log::trace!("{name} = {s}: t = {t}, interval = {interval}, u = {u}");

        debug_assert!((3..n).contains(&interval));
        debug_assert!((0.0..=1.0).contains(&u));
        Ok(Self { interval, u })
    }

    /// Indices of the four control points blended on this span.
    pub fn window(&self) -> Range<usize> {
        self.interval - 3..self.interval + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_end() {
        let span = Span::locate(0.0, 7).unwrap();
        assert_eq!(span, Span { interval: 3, u: 0.0 });
        assert_eq!(span.window(), 0..4);
    }

    #[test]
    fn right_end_folds_back() {
        let span = Span::locate(1.0, 7).unwrap();
        assert_eq!(span, Span { interval: 6, u: 1.0 });
        assert_eq!(span.window(), 3..7);
    }

    #[test]
    fn interior() {
        // t = 3 + 0.5 * 4 = 5
        let span = Span::locate(0.5, 7).unwrap();
        assert_eq!(span.interval, 5);
        assert_eq!(span.u, 0.0);

        // t = 3 + 0.375 * 4 = 4.5
        let span = Span::locate(0.375, 7).unwrap();
        assert_eq!(span.interval, 4);
        assert!((span.u - 0.5).abs() < 1e-12);
    }

    #[test]
    fn every_knot_is_valid() {
        for n in 4..40 {
            for k in 0..=(n - 3) {
                let s = k as f64 / (n - 3) as f64;
                let span = Span::locate(s, n).unwrap();
                assert!(span.interval >= 3 && span.interval < n);
                assert!((0.0..=1.0).contains(&span.u));
            }
        }
    }

    #[test]
    fn single_segment() {
        let span = Span::locate(1.0, 4).unwrap();
        assert_eq!(span, Span { interval: 3, u: 1.0 });
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Span::locate(1.5, 7),
            Err(Error::ParameterOutOfRange {
                name: "s",
                value: 1.5
            })
        );
        assert!(Span::locate(-0.0001, 7).is_err());
        assert!(Span::locate(f64::NAN, 7).is_err());
        assert_eq!(
            Span::locate(0.5, 3),
            Err(Error::TooFewControlPoints { count: 3 })
        );
    }
}
