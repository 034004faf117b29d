pub mod config;
mod descent;
pub mod grid_descent;
pub mod hill_climb;
pub mod window_descent;

pub use config::Hyperparameters;

use anyhow::{anyhow, Result};
use antenna_challenges::{Challenge, Solution};
use serde_json::{Map, Value};
use std::cell::RefCell;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Strategy {
    HillClimb,
    GridDescent,
    WindowDescent,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::HillClimb => write!(f, "hill_climb"),
            Strategy::GridDescent => write!(f, "grid_descent"),
            Strategy::WindowDescent => write!(f, "window_descent"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hill_climb" => Ok(Strategy::HillClimb),
            "grid_descent" => Ok(Strategy::GridDescent),
            "window_descent" => Ok(Strategy::WindowDescent),
            _ => Err(anyhow!("Invalid strategy: {}", s)),
        }
    }
}

impl Strategy {
    pub fn solve_challenge(
        &self,
        challenge: &Challenge,
        save_solution: &dyn Fn(&Solution) -> Result<()>,
        hyperparameters: &Option<Map<String, Value>>,
    ) -> Result<()> {
        match self {
            Strategy::HillClimb => {
                hill_climb::solve_challenge(challenge, save_solution, hyperparameters)
            }
            Strategy::GridDescent => {
                grid_descent::solve_challenge(challenge, save_solution, hyperparameters)
            }
            Strategy::WindowDescent => {
                window_descent::solve_challenge(challenge, save_solution, hyperparameters)
            }
        }
    }

    /// Runs the strategy and returns the last saved solution with its score.
    pub fn solve(
        &self,
        challenge: &Challenge,
        hyperparameters: &Option<Map<String, Value>>,
    ) -> Result<(Solution, i64)> {
        let solution = RefCell::new(None);
        let save_solution_fn = |s: &Solution| -> Result<()> {
            *solution.borrow_mut() = Some(s.clone());
            Ok(())
        };
        self.solve_challenge(challenge, &save_solution_fn, hyperparameters)?;
        let solution = solution
            .into_inner()
            .ok_or_else(|| anyhow!("Strategy {} saved no solution", self))?;
        let score = challenge.evaluate_solution(&solution)?;
        Ok((solution, score))
    }
}
