use nalgebra_glm::DVec3;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Spline(#[from] bspline::Error),

    #[error(transparent)]
    Kinematics(#[from] kinematics::Error),

    #[error("shot height z = {shot_z} must be below bounce height z = {bounce_z}")]
    ShotNotBelowBounce { shot_z: f64, bounce_z: f64 },

    #[error("bounce at {0:?} is lower than the rim")]
    BounceBelowRim(DVec3),

    #[error("need at least 2 points to draw an arc, got {0}")]
    TooFewArcPoints(usize),

    #[error("optimizer failed: {0}")]
    Optimizer(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
