//! Clamped uniform cubic B-splines.
//!
//! A [`ClampedCubicCurve`] blends an ordered sequence of control points into
//! a C² curve that starts at the first point and ends at the last one. A
//! [`ClampedCubicSurface`] does the same for a rectangular grid of control
//! points, as the tensor product of two such curves.
//!
//! Both are parameterised over `[0, 1]`; any parameter outside that range is
//! rejected with [`Error::ParameterOutOfRange`] rather than clamped.
//!
//! ```
//! use bspline::{ClampedCubicCurve, ControlPolygon};
//! use nalgebra_glm as glm;
//!
//! let polygon = ControlPolygon::new(vec![
//!     glm::vec2(0.0, 0.0),
//!     glm::vec2(1.0, 2.0),
//!     glm::vec2(2.0, 2.0),
//!     glm::vec2(3.0, 0.0),
//! ])
//! .unwrap();
//! let curve = ClampedCubicCurve::new(polygon);
//! let end = curve.point(1.0).unwrap();
//! assert!((end - glm::vec2(3.0, 0.0)).norm() < 1e-12);
//! ```
#![allow(clippy::needless_range_loop)]

pub mod basis;
mod control;
mod curve;
mod error;
mod sampled_surface;
mod span;
mod surface;

use nalgebra_glm::TVec;

/// A control point or evaluated point in `D` dimensions.
pub type Point<const D: usize> = TVec<f64, D>;

/// Number of copies of each boundary point added on either side when
/// clamping.
pub const PADDING: usize = 2;

/// Smallest control sequence that still holds one cubic segment.
pub const MIN_CONTROL_POINTS: usize = 4;

pub use crate::control::{ControlGrid, ControlPolygon};
pub use crate::curve::ClampedCubicCurve;
pub use crate::error::{Error, Result};
pub use crate::sampled_surface::SampledSurface;
pub use crate::span::{Span, SurfaceSpan};
pub use crate::surface::ClampedCubicSurface;

pub type ClampedCurve2 = ClampedCubicCurve<2>;
pub type ClampedSurface3 = ClampedCubicSurface<3>;
