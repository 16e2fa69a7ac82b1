//! A curved basketball backboard modelled as a clamped bicubic B-spline
//! surface, and the shots that bounce off it.
//!
//! World coordinates are in metres with `z` pointing down, so heights above
//! the floor are negative `z` values. The floor is the plane `z = 0` and the
//! backboard faces the court along `+y`.
mod backboard;
mod bounce;
mod error;
mod hoop;
mod optimize;
mod shot;

pub use crate::backboard::{Backboard, Sample};
pub use crate::bounce::Bounce;
pub use crate::error::{Error, Result};
pub use crate::hoop::Hoop;
pub use crate::optimize::{Optimized, Optimizer};
pub use crate::shot::{Shot, GRAVITY};
