use crate::{Bindings, Equation, Error, Expr, Result};

/// One branch of a solved system: a value expression per unknown.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub values: Vec<(String, Expr)>,
}

impl Solution {
    pub fn get(&self, unknown: &str) -> Option<&Expr> {
        self.values
            .iter()
            .find(|(name, _)| name == unknown)
            .map(|(_, e)| e)
    }

    /// Evaluates every unknown from the given knowns.
    pub fn evaluate(&self, knowns: &Bindings) -> Result<Vec<(String, f64)>> {
        self.values
            .iter()
            .map(|(name, e)| Ok((name.clone(), e.eval(knowns)?)))
            .collect()
    }
}

/// The launch equations together with their solutions for `(v0, t)`.
#[derive(Clone, Debug, PartialEq)]
pub struct LaunchSystem {
    pub knowns: Vec<String>,
    pub unknowns: Vec<String>,
    pub equations: Vec<Equation>,
    pub solutions: Vec<Solution>,
}

/// Motion under constant acceleration `a` that starts at height `p0` with
/// speed `v0` and reaches height 0 with speed `vf` after time `t`:
///
/// ```text
/// vf = v0 + a*t
/// 0 = p0 + v0*t + a*t^2/2
/// ```
///
/// Eliminating `v0` leaves `a*t^2/2 - vf*t - p0 = 0`, whose two roots give
/// the two branches `v0 = ∓sqrt(2*a*p0 + vf^2)`.
pub fn launch_system() -> LaunchSystem {
    let s = Expr::sym;
    let equations = vec![
        Equation::new("vf", s("v0") + s("a") * s("t")),
        Equation::new(
            0.0,
            s("p0") + s("v0") * s("t") + s("a") * s("t").pow(2) / 2.0,
        ),
    ];

    let root = || (2.0 * s("a") * s("p0") + s("vf").pow(2)).sqrt();
    let solutions = vec![
        Solution {
            values: vec![
                ("v0".to_owned(), -root()),
                ("t".to_owned(), (s("vf") + root()) / s("a")),
            ],
        },
        Solution {
            values: vec![
                ("v0".to_owned(), root()),
                ("t".to_owned(), (s("vf") - root()) / s("a")),
            ],
        },
    ];

    LaunchSystem {
        knowns: ["vf", "a", "p0"].map(String::from).to_vec(),
        unknowns: ["v0", "t"].map(String::from).to_vec(),
        equations,
        solutions,
    }
}

/// Numeric launch parameters for one branch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Launch {
    pub v0: f64,
    pub t: f64,
}

/// Numeric form of [`launch_system`]: both branches, in the same order.
pub fn solve_launch(vf: f64, a: f64, p0: f64) -> Result<[Launch; 2]> {
    let disc = 2.0 * a * p0 + vf * vf;
    if disc < 0.0 {
        return Err(Error::NotReal(format!("sqrt({disc})")));
    }
    if a == 0.0 {
        return Err(Error::NotReal("division by a = 0".to_owned()));
    }
    let root = disc.sqrt();
    log::trace!("launch: vf = {vf}, a = {a}, p0 = {p0}, root = {root}");
    Ok([
        Launch {
            v0: -root,
            t: (vf + root) / a,
        },
        Launch {
            v0: root,
            t: (vf - root) / a,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn printed_form() {
        let system = launch_system();
        let eqs: Vec<_> = system.equations.iter().map(|e| e.to_string()).collect();
        assert_eq!(eqs, ["vf = v0 + a*t", "0 = p0 + v0*t + a*t^2/2"]);

        let first = &system.solutions[0];
        assert_eq!(first.get("v0").unwrap().to_string(), "-sqrt(2*a*p0 + vf^2)");
        assert_eq!(
            first.get("t").unwrap().to_string(),
            "(vf + sqrt(2*a*p0 + vf^2))/a"
        );
        assert!(first.get("x").is_none());
    }

    #[test]
    fn solutions_satisfy_the_equations() {
        let system = launch_system();
        let knowns = Bindings::new()
            .with("vf", 0.5)
            .with("a", 9.81)
            .with("p0", 2.3);
        for solution in &system.solutions {
            let mut all = knowns.clone();
            for (name, value) in solution.evaluate(&knowns).unwrap() {
                all.set(&name, value);
            }
            for eq in &system.equations {
                assert_abs_diff_eq!(eq.residual(&all).unwrap(), 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn numeric_matches_symbolic() {
        let (vf, a, p0) = (1.5, -9.81, -0.4);
        let knowns = Bindings::new().with("vf", vf).with("a", a).with("p0", p0);
        let numeric = solve_launch(vf, a, p0).unwrap();
        for (launch, solution) in numeric.iter().zip(&launch_system().solutions) {
            let values = solution.evaluate(&knowns).unwrap();
            assert_abs_diff_eq!(values[0].1, launch.v0, epsilon = 1e-12);
            assert_abs_diff_eq!(values[1].1, launch.t, epsilon = 1e-12);
        }
    }

    #[test]
    fn unreachable_height() {
        // decelerating upwards, never reaches the target
        assert!(matches!(solve_launch(0.0, 9.81, -1.0), Err(Error::NotReal(_))));
        let knowns = Bindings::new().with("vf", 0.0).with("a", 9.81).with("p0", -1.0);
        assert!(launch_system().solutions[0].evaluate(&knowns).is_err());
    }

    #[test]
    fn zero_acceleration() {
        assert!(solve_launch(1.0, 0.0, 1.0).is_err());
    }
}
