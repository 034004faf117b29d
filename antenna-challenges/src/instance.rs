use crate::{Placement, Solution};
use anyhow::{anyhow, Context, Result};
use rand::{rngs::SmallRng, seq::index, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, fs, path::Path};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Building {
    pub row: usize,
    pub col: usize,
    /// Score lost per unit of distance to the serving antenna.
    pub decay: u32,
    pub value: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Antenna {
    /// Maximum Manhattan distance at which the antenna serves a building.
    pub range: usize,
    pub capacity: u32,
}

/// Parameters for [`Challenge::generate_instance`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    pub width: usize,
    pub height: usize,
    pub num_buildings: usize,
    pub num_antennas: usize,
    pub reward: u32,
}

/// An immutable problem instance: the grid, the buildings on it, the
/// antennas to place and the bonus for connecting every building.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub buildings: Vec<Building>,
    pub antennas: Vec<Antenna>,
    pub reward: u32,
}

/// Largest number of grid cells an instance may have.
pub const MAX_CELLS: usize = 1 << 26;

/// Number of cells of a `width` x `height` grid, or an error if the grid is
/// empty or larger than [`MAX_CELLS`].
fn grid_cells(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(anyhow!("Grid must be non-empty, got {}x{}", width, height));
    }
    width
        .checked_mul(height)
        .filter(|&cells| cells <= MAX_CELLS)
        .ok_or_else(|| {
            anyhow!(
                "Grid {}x{} exceeds the limit of {} cells",
                width,
                height,
                MAX_CELLS
            )
        })
}

impl Challenge {
    pub fn new(
        name: impl Into<String>,
        width: usize,
        height: usize,
        buildings: Vec<Building>,
        antennas: Vec<Antenna>,
        reward: u32,
    ) -> Result<Self> {
        grid_cells(width, height)?;
        let mut occupied = HashSet::with_capacity(buildings.len());
        for (i, building) in buildings.iter().enumerate() {
            if building.row >= height || building.col >= width {
                return Err(anyhow!(
                    "Building {} at (col {}, row {}) is outside the {}x{} grid",
                    i,
                    building.col,
                    building.row,
                    width,
                    height
                ));
            }
            if !occupied.insert((building.row, building.col)) {
                return Err(anyhow!(
                    "Building {} shares cell (col {}, row {}) with another building",
                    i,
                    building.col,
                    building.row
                ));
            }
        }
        Ok(Self {
            name: name.into(),
            width,
            height,
            buildings,
            antennas,
            reward,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read instance {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::parse(name, &text).with_context(|| format!("Invalid instance {}", path.display()))
    }

    /// Parses the whitespace separated instance format:
    ///
    /// ```text
    /// W H
    /// N M R
    /// col row decay value   (N lines)
    /// range capacity        (M lines)
    /// ```
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self> {
        let mut lines = Fields::new(text);
        let [width, height] = lines.next_record("grid size")?;
        let [num_buildings, num_antennas, reward] = lines.next_record("counts")?;

        let buildings = (0..num_buildings)
            .map(|i| {
                let [col, row, decay, value] = lines.next_record(&format!("building {}", i))?;
                Ok(Building {
                    row: row as usize,
                    col: col as usize,
                    decay: to_u32(decay, "decay")?,
                    value: to_u32(value, "value")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let antennas = (0..num_antennas)
            .map(|j| {
                let [range, capacity] = lines.next_record(&format!("antenna {}", j))?;
                Ok(Antenna {
                    range: range as usize,
                    capacity: to_u32(capacity, "capacity")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        lines.finish()?;

        Self::new(
            name,
            width as usize,
            height as usize,
            buildings,
            antennas,
            to_u32(reward, "reward")?,
        )
    }

    pub fn generate_instance(seed: &[u8; 32], track: &Track) -> Result<Self> {
        let num_cells = grid_cells(track.width, track.height)?;
        if track.num_buildings > num_cells {
            return Err(anyhow!(
                "Cannot place {} buildings on {} cells",
                track.num_buildings,
                num_cells
            ));
        }
        let mut rng = SmallRng::from_seed(seed.clone());
        let max_range = 1.max((track.width + track.height) / 8);

        let buildings = index::sample(&mut rng, num_cells, track.num_buildings)
            .into_iter()
            .map(|cell| Building {
                row: cell / track.width,
                col: cell % track.width,
                decay: rng.gen_range(1..=10),
                value: rng.gen_range(1..=100),
            })
            .collect();
        let antennas = (0..track.num_antennas)
            .map(|_| Antenna {
                range: rng.gen_range(0..=max_range),
                capacity: rng.gen_range(1..=100),
            })
            .collect();

        Self::new(
            "generated",
            track.width,
            track.height,
            buildings,
            antennas,
            track.reward,
        )
    }

    pub fn num_buildings(&self) -> usize {
        self.buildings.len()
    }

    pub fn num_antennas(&self) -> usize {
        self.antennas.len()
    }

    pub fn num_cells(&self) -> usize {
        self.width * self.height
    }

    /// Score of a complete solution, or an error if it is not a valid
    /// placement for this challenge.
    pub fn evaluate_solution(&self, solution: &Solution) -> Result<i64> {
        let mut placement = Placement::from_solution(self, solution)?;
        Ok(placement.score())
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.width, self.height)?;
        writeln!(
            f,
            "{} {} {}",
            self.buildings.len(),
            self.antennas.len(),
            self.reward
        )?;
        for b in &self.buildings {
            writeln!(f, "{} {} {} {}", b.col, b.row, b.decay, b.value)?;
        }
        for a in &self.antennas {
            writeln!(f, "{} {}", a.range, a.capacity)?;
        }
        Ok(())
    }
}

fn to_u32(v: u64, field: &str) -> Result<u32> {
    u32::try_from(v).map_err(|_| anyhow!("{} {} does not fit in 32 bits", field, v))
}

/// Line oriented reader of unsigned integer records. Blank lines are skipped.
pub(crate) struct Fields<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
        }
    }

    pub(crate) fn next_record<const K: usize>(&mut self, what: &str) -> Result<[u64; K]> {
        let (number, line) = self
            .lines
            .by_ref()
            .find(|(_, line)| !line.trim().is_empty())
            .ok_or_else(|| anyhow!("Unexpected end of input, expected {}", what))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != K {
            return Err(anyhow!(
                "Line {}: expected {} fields for {}, found {}",
                number + 1,
                K,
                what,
                tokens.len()
            ));
        }
        let mut record = [0u64; K];
        for (slot, token) in record.iter_mut().zip(tokens) {
            *slot = token.parse().map_err(|_| {
                anyhow!(
                    "Line {}: '{}' is not a non-negative integer ({})",
                    number + 1,
                    token,
                    what
                )
            })?;
        }
        Ok(record)
    }

    pub(crate) fn finish(mut self) -> Result<()> {
        match self.lines.find(|(_, line)| !line.trim().is_empty()) {
            Some((number, _)) => Err(anyhow!("Line {}: unexpected trailing data", number + 1)),
            None => Ok(()),
        }
    }
}
