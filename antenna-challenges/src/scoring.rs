use crate::Placement;
use anyhow::{anyhow, Result};
use std::ops::Deref;

/// Marginal effect of putting one antenna on one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delta {
    pub score: i64,
    /// Buildings reached that no antenna had claimed before.
    pub new_connected: usize,
}

impl<'a> Placement<'a> {
    /// Recomputes every building claim and the cached totals from scratch.
    pub fn score(&mut self) -> i64 {
        self.building_scores.fill(None);
        self.total_score = 0;
        self.total_connected = 0;
        for antenna in 0..self.challenge.num_antennas() {
            if let Some((row, col)) = self.position(antenna) {
                let delta = self.d_score(antenna, row, col, true);
                self.total_score += delta.score;
                self.total_connected += delta.new_connected;
            }
        }
        self.total_score
    }

    /// Score gained by `antenna` serving from `(row, col)` against the
    /// current claim table. With `update_scores` the antenna's winning claims
    /// are written into the table; cached totals are left to the caller.
    ///
    /// A building is won only by a strictly better score, so earlier claims
    /// keep ties. The completion reward is added when this call connects the
    /// last unconnected buildings.
    ///
    /// # Panics
    ///
    /// If `antenna` is not below `num_antennas()` or `(row, col)` is outside
    /// the grid. [`Placement::begin_probe`] checks both and returns an error.
    pub fn d_score(
        &mut self,
        antenna: usize,
        row: usize,
        col: usize,
        update_scores: bool,
    ) -> Delta {
        let challenge = self.challenge;
        let capacity = challenge.antennas[antenna].capacity as i64;
        let reach = challenge.antennas[antenna]
            .range
            .min(self.grid.max_reach(row, col));

        let mut delta = Delta::default();
        for distance in 0..=reach {
            for (r, c) in self.grid.ring(row, col, distance) {
                let Some(b) = self.grid.building_at(r, c) else {
                    continue;
                };
                let building = &challenge.buildings[b];
                let candidate =
                    building.value as i64 * capacity - building.decay as i64 * distance as i64;
                let gain = match self.building_scores[b] {
                    None => {
                        delta.new_connected += 1;
                        candidate
                    }
                    Some(best) if candidate > best => candidate - best,
                    Some(_) => continue,
                };
                delta.score += gain;
                if update_scores {
                    self.building_scores[b] = Some(candidate);
                }
            }
        }

        if delta.new_connected > 0
            && self.total_connected + delta.new_connected == challenge.num_buildings()
        {
            delta.score += challenge.reward as i64;
        }
        delta
    }

    /// Takes `antenna` off the grid and rebuilds the claim table without it,
    /// so that candidate cells can be compared with [`Probe::delta`].
    pub fn begin_probe(&mut self, antenna: usize) -> Result<Probe<'_, 'a>> {
        let origin = self
            .remove(antenna)
            .ok_or_else(|| anyhow!("Antenna {} is not placed", antenna))?;
        self.score();
        Ok(Probe {
            placement: self,
            antenna,
            origin,
            committed: false,
        })
    }
}

/// An antenna temporarily removed from its placement.
///
/// The claim table holds the baseline without the antenna while the probe
/// lives. [`Probe::commit`] puts it back on a chosen cell; dropping the probe
/// without committing puts it back where it was.
pub struct Probe<'p, 'a> {
    placement: &'p mut Placement<'a>,
    antenna: usize,
    origin: (usize, usize),
    committed: bool,
}

impl<'p, 'a> Probe<'p, 'a> {
    pub fn antenna(&self) -> usize {
        self.antenna
    }

    /// The cell the antenna occupied when the probe began.
    pub fn origin(&self) -> (usize, usize) {
        self.origin
    }

    pub fn is_free(&self, row: usize, col: usize) -> bool {
        self.placement.grid.is_free(row, col)
    }

    pub fn delta(&mut self, row: usize, col: usize) -> Delta {
        self.placement.d_score(self.antenna, row, col, false)
    }

    /// Places the antenna on a free cell, persists its claims and updates the
    /// cached totals.
    pub fn commit(mut self, row: usize, col: usize) -> Result<Delta> {
        if !self.is_free(row, col) {
            return Err(anyhow!(
                "Cannot place antenna {} on (col {}, row {}): cell is taken or outside the grid",
                self.antenna,
                col,
                row
            ));
        }
        self.committed = true;
        Ok(self.reinsert(row, col))
    }

    fn reinsert(&mut self, row: usize, col: usize) -> Delta {
        let placement = &mut *self.placement;
        placement.insert(self.antenna, row, col);
        let delta = placement.d_score(self.antenna, row, col, true);
        placement.total_score += delta.score;
        placement.total_connected += delta.new_connected;
        delta
    }
}

impl<'p, 'a> Deref for Probe<'p, 'a> {
    type Target = Placement<'a>;

    fn deref(&self) -> &Self::Target {
        self.placement
    }
}

impl<'p, 'a> Drop for Probe<'p, 'a> {
    fn drop(&mut self) {
        if !self.committed {
            let (row, col) = self.origin;
            self.reinsert(row, col);
        }
    }
}
