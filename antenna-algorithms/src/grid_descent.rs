use crate::{config::Hyperparameters, descent};
use anyhow::Result;
use antenna_challenges::{Challenge, Placement, Solution};
use log::{debug, info};
use logging_timer::time;
use rand::Rng;
use serde_json::{Map, Value};

pub use crate::descent::Move;

#[time]
pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let params = Hyperparameters::initialize(hyperparameters)?;
    let mut rng = params.rng();
    let mut placement = Placement::new(challenge);
    placement.randomize(&mut rng)?;
    placement.score();

    if challenge.num_antennas() > 0 {
        for _ in 0..params.iterations {
            let antenna = rng.gen_range(0..challenge.num_antennas());
            step(&mut placement, antenna, &params)?;
        }
    }

    info!(
        "{}: grid descent score {}, connected {}",
        challenge.name,
        placement.total_score(),
        placement.total_connected()
    );
    save_solution(&placement.to_solution())
}

/// Re-seats `antenna` on the best free cell of the lattice of rows and
/// columns that are multiples of `step`.
pub fn step(placement: &mut Placement, antenna: usize, params: &Hyperparameters) -> Result<Move> {
    let challenge = placement.challenge();
    let rows = (0..challenge.height).step_by(params.step);
    let cols = (0..challenge.width).step_by(params.step);
    let reseated = descent::reseat(placement, antenna, rows, cols)?;
    debug!(
        "Score: {} Connected: {} Antennas: {}",
        placement.total_score(),
        placement.total_connected(),
        placement.num_active()
    );
    Ok(reseated)
}
