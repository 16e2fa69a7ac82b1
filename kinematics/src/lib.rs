//! Closed-form solutions of the constant-acceleration launch equations.
//!
//! The system is small and fixed, so instead of a general algebra engine
//! this crate carries its solution as symbolic [`Expr`] trees, which can be
//! printed or evaluated numerically.
mod error;
pub mod expr;
mod solve;

pub use crate::error::{Error, Result};
pub use crate::expr::{Bindings, Equation, Expr};
pub use crate::solve::{launch_system, solve_launch, Launch, LaunchSystem, Solution};
