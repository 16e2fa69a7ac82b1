use nalgebra_glm::{self as glm, DVec3};

use crate::{Error, Hoop, Result, Shot, GRAVITY};

/// What happens to a [`Shot`] after it is reflected off the backboard.
#[derive(Clone, Debug, PartialEq)]
pub struct Bounce {
    pub point: DVec3,
    /// Velocity just after the bounce.
    pub velocity: DVec3,
    /// The bounce point is already below the rim plane.
    pub lower_than_hoop: bool,
    /// Where the ball falls through the rim plane, if it bounced above it.
    pub rim_crossing: Option<DVec3>,
    /// Flight time from the bounce to the rim crossing.
    pub rim_time: Option<f64>,
}

impl Bounce {
    /// Mirrors the incoming velocity about the surface `normal` (which need
    /// not face the shot) and follows the ball down to rim height.
    pub fn new(shot: &Shot, normal: &DVec3) -> Self {
        let v_in = shot.bounce_velocity();
        let velocity = v_in - normal * (2.0 * glm::dot(&v_in, normal));
        let point = shot.bounce_point;

        let rim_z = -Hoop::RIM_HEIGHT;
        let drop = rim_z - point.z;
        let lower_than_hoop = drop < 0.0;
        let rim_time = (!lower_than_hoop).then(|| {
            let vz = velocity.z;
            (-vz + (vz * vz + 2.0 * GRAVITY * drop).sqrt()) / GRAVITY
        });
        let rim_crossing = rim_time
            .map(|t| glm::vec3(point.x + velocity.x * t, point.y + velocity.y * t, rim_z));

        Self {
            point,
            velocity,
            lower_than_hoop,
            rim_crossing,
            rim_time,
        }
    }

    /// Where the ball is `t` seconds after the bounce.
    pub fn position(&self, t: f64) -> DVec3 {
        self.point + self.velocity * t + glm::vec3(0.0, 0.0, 0.5 * GRAVITY * t * t)
    }

    /// `n` points along the rebound, from the bounce point to the rim
    /// crossing. Empty when the bounce starts below the rim.
    pub fn arc(&self, n: usize) -> Result<Vec<DVec3>> {
        if n < 2 {
            return Err(Error::TooFewArcPoints(n));
        }
        let Some(t_rim) = self.rim_time else {
            return Ok(Vec::new());
        };
        Ok((0..n)
            .map(|k| self.position(k as f64 * t_rim / (n - 1) as f64))
            .collect())
    }

    /// Horizontal miss distance at rim height, `None` for a bounce that
    /// starts below the rim.
    pub fn xy_distance_from_hoop(&self) -> Option<f64> {
        let c = Hoop::rim_center();
        self.rim_crossing
            .map(|p| glm::length(&glm::vec2(p.x - c.x, p.y - c.y)))
    }
}
