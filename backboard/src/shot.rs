use kinematics::solve_launch;
use nalgebra_glm::{self as glm, DVec3};

use crate::{Error, Result};

/// Gravitational acceleration along `+z`, m/s².
pub const GRAVITY: f64 = 9.81;

/// A ballistic flight from a shot point to a bounce point on the backboard.
#[derive(Clone, Debug, PartialEq)]
pub struct Shot {
    pub shot_point: DVec3,
    pub bounce_point: DVec3,
    pub vz_shot: f64,
    pub vx: f64,
    pub vy: f64,
    pub bounce_time: f64,
}

impl Shot {
    /// Vertical speed on arrival at the backboard. Fixing it leaves exactly
    /// one trajectory between two points.
    pub const BOUNCE_VZ: f64 = 0.5;

    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn new(shot_point: DVec3, bounce_point: DVec3) -> Result<Self> {
        // also rejects a NaN height on either end
        if !(shot_point.z > bounce_point.z) {
            return Err(Error::ShotNotBelowBounce {
                shot_z: shot_point.z,
                bounce_z: bounce_point.z,
            });
        }

        // Rising branch of the launch equations, measured from the bounce
        // height: the ball leaves upwards (negative z speed).
        let [rising, _] = solve_launch(Self::BOUNCE_VZ, GRAVITY, shot_point.z - bounce_point.z)?;
        let bounce_time = rising.t;
        debug_assert!(bounce_time > 0.0);

        Ok(Self {
            shot_point,
            bounce_point,
            vz_shot: rising.v0,
            vx: (bounce_point.x - shot_point.x) / bounce_time,
            vy: (bounce_point.y - shot_point.y) / bounce_time,
            bounce_time,
        })
    }

    pub fn position(&self, t: f64) -> DVec3 {
        glm::vec3(
            self.shot_point.x + self.vx * t,
            self.shot_point.y + self.vy * t,
            self.shot_point.z + self.vz_shot * t + 0.5 * GRAVITY * t * t,
        )
    }

    /// Velocity just before hitting the backboard.
    pub fn bounce_velocity(&self) -> DVec3 {
        glm::vec3(self.vx, self.vy, Self::BOUNCE_VZ)
    }

    /// `n` points along the flight, from the shot point to the bounce point.
    pub fn arc(&self, n: usize) -> Result<Vec<DVec3>> {
        if n < 2 {
            return Err(Error::TooFewArcPoints(n));
        }
        Ok((0..n)
            .map(|k| self.position(k as f64 * self.bounce_time / (n - 1) as f64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn flight_hits_both_ends() {
        let shot = Shot::new(glm::vec3(1.0, 4.0, 0.0), glm::vec3(0.2, 0.1, -3.6)).unwrap();
        assert!(shot.vz_shot < 0.0);
        assert_abs_diff_eq!(shot.position(0.0), shot.shot_point);
        assert_abs_diff_eq!(
            shot.position(shot.bounce_time),
            shot.bounce_point,
            epsilon = 1e-12
        );

        let arc = shot.arc(64).unwrap();
        assert_eq!(arc.len(), 64);
        assert_abs_diff_eq!(arc[63], shot.bounce_point, epsilon = 1e-12);
    }

    #[test]
    fn arrives_descending_at_fixed_speed() {
        let shot = Shot::new(glm::vec3(0.0, 3.0, 0.0), glm::vec3(0.0, 0.0, -4.0)).unwrap();
        let vz = shot.vz_shot + GRAVITY * shot.bounce_time;
        assert_abs_diff_eq!(vz, Shot::BOUNCE_VZ, epsilon = 1e-12);
        assert_eq!(shot.bounce_velocity().z, Shot::BOUNCE_VZ);
    }

    #[test]
    fn shot_must_start_lower() {
        let err = Shot::new(glm::vec3(0.0, 3.0, -5.0), glm::vec3(0.0, 0.0, -4.0)).unwrap_err();
        assert_eq!(
            err,
            Error::ShotNotBelowBounce {
                shot_z: -5.0,
                bounce_z: -4.0
            }
        );
        let shot = Shot::new(glm::vec3(0.0, 3.0, 0.0), glm::vec3(0.0, 0.0, -4.0)).unwrap();
        assert!(matches!(shot.arc(1), Err(Error::TooFewArcPoints(1))));
    }

    #[test]
    fn nan_height_is_rejected() {
        let bounce = glm::vec3(0.0, 0.0, -4.0);
        assert!(matches!(
            Shot::new(glm::vec3(0.0, 3.0, f64::NAN), bounce),
            Err(Error::ShotNotBelowBounce { .. })
        ));
        assert!(matches!(
            Shot::new(glm::vec3(0.0, 3.0, 0.0), glm::vec3(0.0, 0.0, f64::NAN)),
            Err(Error::ShotNotBelowBounce { .. })
        ));
    }
}
