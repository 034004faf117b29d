use crate::{config::Hyperparameters, descent};
use anyhow::{anyhow, Result};
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
        "{}: window descent score {}, connected {}",
        challenge.name,
        placement.total_score(),
        placement.total_connected()
    );
    save_solution(&placement.to_solution())
}

/// Re-seats `antenna` on the best free cell of a `window_size` window
/// reaching `window_size / 2` cells behind its current cell and
/// `window_size - 1` ahead, on both axes.
pub fn step(placement: &mut Placement, antenna: usize, params: &Hyperparameters) -> Result<Move> {
    let challenge = placement.challenge();
    let (row, col) = placement
        .position(antenna)
        .ok_or_else(|| anyhow!("Antenna {} is not placed", antenna))?;
    let rows = descent::window(row, params.window_size, challenge.height);
    let cols = descent::window(col, params.window_size, challenge.width);
    let reseated = descent::reseat(placement, antenna, rows, cols)?;
    debug!(
        "Score: {} Connected: {} Antennas: {}",
        placement.total_score(),
        placement.total_connected(),
        placement.num_active()
    );
    Ok(reseated)
}
