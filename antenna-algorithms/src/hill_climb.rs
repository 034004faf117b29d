use crate::config::Hyperparameters;
use anyhow::Result;
use antenna_challenges::{Challenge, Placement, Solution};
use log::{debug, info};
use logging_timer::time;
use rand::Rng;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The target cell was outside the grid or already held an antenna.
    Skipped,
    Accepted { previous: i64, score: i64 },
    Rejected,
}

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

    let mut accepted = 0;
    for _ in 0..params.iterations {
        if let Step::Accepted { .. } = step(&mut placement, &params, &mut rng) {
            accepted += 1;
        }
    }

    let score = placement.score();
    info!(
        "{}: hill climbing accepted {} of {} moves, score {}, connected {}",
        challenge.name,
        accepted,
        params.iterations,
        score,
        placement.total_connected()
    );
    save_solution(&placement.to_solution())
}

/// One random move of one antenna, kept only if the full score strictly
/// improves. A rejected move restores the antenna to its old cell and the
/// score caches to the previous placement.
pub fn step<R: Rng>(placement: &mut Placement, params: &Hyperparameters, rng: &mut R) -> Step {
    let num_antennas = placement.challenge().num_antennas();
    if num_antennas == 0 {
        return Step::Skipped;
    }
    let antenna = rng.gen_range(0..num_antennas);
    let Some((old_row, old_col)) = placement.position(antenna) else {
        return Step::Skipped;
    };
    let Some((row, col)) = pick_target(placement, (old_row, old_col), params, rng) else {
        return Step::Skipped;
    };
    if !placement.grid().is_free(row, col) {
        return Step::Skipped;
    }

    let previous = placement.score();
    placement.move_to(antenna, row, col);
    let score = placement.score();

    if score > previous {
        debug!(
            "New score: {} prev score {} Connected: {}",
            score,
            previous,
            placement.total_connected()
        );
        Step::Accepted { previous, score }
    } else {
        placement.move_to(antenna, old_row, old_col);
        placement.score();
        Step::Rejected
    }
}

fn pick_target<R: Rng>(
    placement: &Placement,
    (row, col): (usize, usize),
    params: &Hyperparameters,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let challenge = placement.challenge();
    let rnd: f64 = rng.r#gen();
    if rnd < params.random_cell_threshold {
        Some((
            rng.gen_range(0..challenge.height),
            rng.gen_range(0..challenge.width),
        ))
    } else if rnd < params.building_threshold {
        if challenge.buildings.is_empty() {
            return None;
        }
        let building = &challenge.buildings[rng.gen_range(0..challenge.num_buildings())];
        Some((building.row, building.col))
    } else {
        let offset = i64::try_from(params.max_offset).ok()?;
        let row = (row as i64).saturating_add(rng.gen_range(-offset..=offset));
        let col = (col as i64).saturating_add(rng.gen_range(-offset..=offset));
        placement
            .grid()
            .contains(row, col)
            .then(|| (row as usize, col as usize))
    }
}
