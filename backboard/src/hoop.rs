use nalgebra_glm::{self as glm, DVec3};

use crate::{Error, Result};

/// Regulation hoop dimensions.
pub struct Hoop;

impl Hoop {
    /// 10 feet
    pub const RIM_HEIGHT: f64 = 3.05;
    /// 18 inches
    pub const RIM_DIAMETER: f64 = 0.4572;
    /// Gap between the backboard and the near side of the rim, 6 inches.
    pub const RIM_BACKBOARD_OFFSET: f64 = 0.151;
    pub const RIM_CENTER_Y: f64 = Self::RIM_BACKBOARD_OFFSET + Self::RIM_DIAMETER;

    pub fn rim_center() -> DVec3 {
        glm::vec3(0.0, Self::RIM_CENTER_Y, -Self::RIM_HEIGHT)
    }

    /// `n` points around the rim, first and last coinciding.
    pub fn rim_arc(n: usize) -> Result<Vec<DVec3>> {
        if n < 2 {
            return Err(Error::TooFewArcPoints(n));
        }
        let r = Self::RIM_DIAMETER / 2.0;
        Ok((0..n)
            .map(|k| {
                let theta = 2.0 * std::f64::consts::PI * k as f64 / (n - 1) as f64;
                glm::vec3(
                    r * theta.sin(),
                    Self::RIM_CENTER_Y + r * theta.cos(),
                    -Self::RIM_HEIGHT,
                )
            })
            .collect())
    }
}
