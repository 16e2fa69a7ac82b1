use argmin::core::observers::{Observe, ObserverMode};
use argmin::core::{CostFunction, Executor, State, KV};
use argmin::solver::neldermead::NelderMead;

use crate::{Backboard, Error, Result};

/// Nelder-Mead search over the depth of every control point of a
/// [`Backboard`], minimising [`Backboard::objective`].
#[derive(Clone, Debug, PartialEq)]
pub struct Optimizer {
    /// Surface samples across the board used by the objective
    pub nu: usize,
    /// Surface samples from top to bottom used by the objective
    pub nv: usize,
    pub lower: f64,
    pub upper: f64,
    /// Edge length of the starting simplex along each design variable
    pub initial_step: f64,
    /// Stops once the standard deviation of the simplex costs drops below
    /// this.
    pub tolerance: f64,
    pub max_iters: u64,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self {
            nu: 14,
            nv: 8,
            lower: -10.0,
            upper: 2.0,
            initial_step: 0.1,
            tolerance: 1e-4,
            max_iters: 5000,
        }
    }
}

/// Result of [`Optimizer::optimize`].
#[derive(Clone, Debug)]
pub struct Optimized {
    pub board: Backboard,
    pub objective: f64,
    pub initial_objective: f64,
    pub iterations: u64,
}

/// The objective as seen by the solver: design variables are clamped into
/// the bounds before the board is evaluated.
struct Objective {
    board: Backboard,
    nu: usize,
    nv: usize,
    lower: f64,
    upper: f64,
}

impl Objective {
    fn design(&self, dvs: &[f64]) -> Result<Backboard> {
        let clamped: Vec<f64> = dvs.iter().map(|y| y.clamp(self.lower, self.upper)).collect();
        self.board.with_design_variables(&clamped)
    }
}

impl CostFunction for Objective {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, dvs: &Vec<f64>) -> std::result::Result<f64, argmin::core::Error> {
        Ok(self.design(dvs)?.objective(self.nu, self.nv)?)
    }
}

/// Hands the best board so far to a callback after every iteration.
struct Progress<F> {
    objective: Objective,
    callback: F,
}

impl<I, F> Observe<I> for Progress<F>
where
    I: State<Param = Vec<f64>>,
    F: FnMut(&Backboard),
{
    fn observe_iter(&mut self, state: &I, _kv: &KV) -> std::result::Result<(), argmin::core::Error> {
        if let Some(dvs) = state.get_best_param() {
            let board = self.objective.design(dvs)?;
            (self.callback)(&board);
        }
        Ok(())
    }
}

impl Optimizer {
    pub fn optimize(&self, board: &Backboard) -> Result<Optimized> {
        self.optimize_with(board, |_| ())
    }

    /// Like [`Optimizer::optimize`], calling `progress` with the best board
    /// found so far after every iteration.
    pub fn optimize_with<F>(&self, board: &Backboard, progress: F) -> Result<Optimized>
    where
        F: FnMut(&Backboard) + 'static,
    {
        let objective = || Objective {
            board: board.clone(),
            nu: self.nu,
            nv: self.nv,
            lower: self.lower,
            upper: self.upper,
        };
        let x0: Vec<f64> = board
            .design_variables()
            .into_iter()
            .map(|y| y.clamp(self.lower, self.upper))
            .collect();
        let initial_objective = objective().design(&x0)?.objective(self.nu, self.nv)?;

        let solver = NelderMead::new(self.simplex(&x0))
            .with_sd_tolerance(self.tolerance)
            .map_err(solver_error)?;
        log::info!(
            "optimizing {} design variables, initial objective {initial_objective:.6}",
            x0.len()
        );

        let observer = Progress {
            objective: objective(),
            callback: progress,
        };
        let res = Executor::new(objective(), solver)
            .configure(|state| state.max_iters(self.max_iters))
            .add_observer(observer, ObserverMode::Always)
            .run()
            .map_err(solver_error)?;

        let state = res.state();
        let dvs = state
            .get_best_param()
            .ok_or_else(|| Error::Optimizer("no design was evaluated".to_owned()))?;
        let best = objective().design(dvs)?;
        let value = best.objective(self.nu, self.nv)?;
        log::info!(
            "objective {initial_objective:.6} -> {value:.6} after {} iterations",
            state.get_iter()
        );

        Ok(Optimized {
            board: best,
            objective: value,
            initial_objective,
            iterations: state.get_iter(),
        })
    }

    /// `x0` plus one vertex per design variable, offset by `initial_step`
    /// towards the inside of the bounds.
    fn simplex(&self, x0: &[f64]) -> Vec<Vec<f64>> {
        let mut out = vec![x0.to_vec()];
        for i in 0..x0.len() {
            let mut x = x0.to_vec();
            if x[i] + self.initial_step <= self.upper {
                x[i] += self.initial_step;
            } else {
                x[i] -= self.initial_step;
            }
            out.push(x);
        }
        out
    }
}

/// Recovers our own error when the objective failed, otherwise keeps the
/// solver's message.
fn solver_error(e: argmin::core::Error) -> Error {
    e.downcast::<Error>()
        .unwrap_or_else(|e| Error::Optimizer(e.to_string()))
}
