use crate::{Challenge, Grid, PlacedAntenna, Solution};
use anyhow::{anyhow, Result};
use rand::{seq::index, Rng};

/// Mutable solution state for one challenge: where each antenna sits, the
/// grid occupancy and the best score currently claimed for every building.
///
/// Antenna positions are stored as parallel arrays indexed by antenna, with
/// an explicit active flag. An inactive antenna has no cell on the grid and
/// its `rows`/`cols` entries are meaningless.
#[derive(Debug, Clone)]
pub struct Placement<'a> {
    pub(crate) challenge: &'a Challenge,
    pub(crate) grid: Grid,
    rows: Vec<usize>,
    cols: Vec<usize>,
    active: Vec<bool>,
    pub(crate) building_scores: Vec<Option<i64>>,
    pub(crate) total_score: i64,
    pub(crate) total_connected: usize,
}

impl<'a> Placement<'a> {
    /// Empty placement: no antenna on the grid, every building unclaimed.
    pub fn new(challenge: &'a Challenge) -> Self {
        Self {
            challenge,
            grid: Grid::for_challenge(challenge),
            rows: vec![0; challenge.num_antennas()],
            cols: vec![0; challenge.num_antennas()],
            active: vec![false; challenge.num_antennas()],
            building_scores: vec![None; challenge.num_buildings()],
            total_score: 0,
            total_connected: 0,
        }
    }

    pub fn from_solution(challenge: &'a Challenge, solution: &Solution) -> Result<Self> {
        let mut placement = Self::new(challenge);
        for placed in &solution.antennas {
            if placed.antenna >= challenge.num_antennas() {
                return Err(anyhow!(
                    "Antenna {} does not exist, challenge has {} antennas",
                    placed.antenna,
                    challenge.num_antennas()
                ));
            }
            if placement.is_active(placed.antenna) {
                return Err(anyhow!("Antenna {} is placed twice", placed.antenna));
            }
            if placed.row >= challenge.height || placed.col >= challenge.width {
                return Err(anyhow!(
                    "Antenna {} at (col {}, row {}) is outside the {}x{} grid",
                    placed.antenna,
                    placed.col,
                    placed.row,
                    challenge.width,
                    challenge.height
                ));
            }
            if !placement.insert(placed.antenna, placed.row, placed.col) {
                return Err(anyhow!(
                    "Antenna {} shares cell (col {}, row {}) with another antenna",
                    placed.antenna,
                    placed.col,
                    placed.row
                ));
            }
        }
        Ok(placement)
    }

    pub fn to_solution(&self) -> Solution {
        Solution {
            antennas: (0..self.active.len())
                .filter(|&j| self.active[j])
                .map(|j| PlacedAntenna {
                    antenna: j,
                    row: self.rows[j],
                    col: self.cols[j],
                })
                .collect(),
        }
    }

    pub fn challenge(&self) -> &'a Challenge {
        self.challenge
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn is_active(&self, antenna: usize) -> bool {
        self.active.get(antenna).copied().unwrap_or(false)
    }

    pub fn num_active(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// `(row, col)` of an active antenna.
    pub fn position(&self, antenna: usize) -> Option<(usize, usize)> {
        self.is_active(antenna)
            .then(|| (self.rows[antenna], self.cols[antenna]))
    }

    pub fn building_score(&self, building: usize) -> Option<i64> {
        self.building_scores[building]
    }

    /// Total of the last [`Placement::score`] call, plus any committed probes.
    pub fn total_score(&self) -> i64 {
        self.total_score
    }

    pub fn total_connected(&self) -> usize {
        self.total_connected
    }

    /// Takes every antenna off the grid and forgets all claims.
    pub fn reset(&mut self) {
        self.grid.clear_antennas();
        self.active.fill(false);
        self.building_scores.fill(None);
        self.total_score = 0;
        self.total_connected = 0;
    }

    /// Puts an inactive antenna on a free cell. Returns false, changing
    /// nothing, if the antenna is already active or the cell is taken.
    pub fn insert(&mut self, antenna: usize, row: usize, col: usize) -> bool {
        if antenna >= self.active.len() || self.active[antenna] || !self.grid.is_free(row, col) {
            return false;
        }
        self.rows[antenna] = row;
        self.cols[antenna] = col;
        self.active[antenna] = true;
        self.grid.set_antenna(antenna, row, col);
        true
    }

    /// Takes an active antenna off the grid, returning the cell it occupied.
    pub fn remove(&mut self, antenna: usize) -> Option<(usize, usize)> {
        let (row, col) = self.position(antenna)?;
        self.grid.clear_antenna(row, col);
        self.active[antenna] = false;
        Some((row, col))
    }

    /// Moves an active antenna to a free cell. Returns false, changing
    /// nothing, if the antenna is inactive or the cell is taken.
    ///
    /// Score caches are not touched; call [`Placement::score`] afterwards.
    pub fn move_to(&mut self, antenna: usize, row: usize, col: usize) -> bool {
        let Some((old_row, old_col)) = self.position(antenna) else {
            return false;
        };
        if !self.grid.is_free(row, col) {
            return false;
        }
        self.grid.clear_antenna(old_row, old_col);
        self.grid.set_antenna(antenna, row, col);
        self.rows[antenna] = row;
        self.cols[antenna] = col;
        true
    }

    /// Resets the placement and puts every antenna on a distinct cell drawn
    /// uniformly without replacement. Antenna `j` gets the `j`-th draw.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let challenge = self.challenge;
        if challenge.num_antennas() > challenge.num_cells() {
            return Err(anyhow!(
                "Cannot place {} antennas on a {}x{} grid",
                challenge.num_antennas(),
                challenge.width,
                challenge.height
            ));
        }
        self.reset();
        let cells = index::sample(rng, challenge.num_cells(), challenge.num_antennas());
        for (antenna, cell) in cells.into_iter().enumerate() {
            self.insert(antenna, cell / challenge.width, cell % challenge.width);
        }
        Ok(())
    }
}
