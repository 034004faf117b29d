use crate::Challenge;
use ndarray::Array2;

/// Row/column steps walked along the four edges of a Manhattan ring.
const RING_DIRECTIONS: [(i64, i64); 4] = [(-1, 1), (1, 1), (1, -1), (-1, -1)];

/// Dense H×W lookup tables for the building occupying each cell and the
/// antenna currently placed on it. Indexing is `[row, col]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    buildings: Array2<Option<usize>>,
    antennas: Array2<Option<usize>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buildings: Array2::from_elem((height, width), None),
            antennas: Array2::from_elem((height, width), None),
        }
    }

    /// Building layer filled from a validated challenge, antenna layer empty.
    pub fn for_challenge(challenge: &Challenge) -> Self {
        let mut grid = Self::new(challenge.width, challenge.height);
        for (index, building) in challenge.buildings.iter().enumerate() {
            grid.buildings[[building.row, building.col]] = Some(index);
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.buildings.ncols()
    }

    pub fn height(&self) -> usize {
        self.buildings.nrows()
    }

    pub fn contains(&self, row: i64, col: i64) -> bool {
        0 <= row && row < self.height() as i64 && 0 <= col && col < self.width() as i64
    }

    pub fn building_at(&self, row: usize, col: usize) -> Option<usize> {
        self.buildings[[row, col]]
    }

    pub fn antenna_at(&self, row: usize, col: usize) -> Option<usize> {
        self.antennas[[row, col]]
    }

    /// True when the cell is inside the grid and holds no antenna.
    pub fn is_free(&self, row: usize, col: usize) -> bool {
        self.antennas
            .get((row, col))
            .is_some_and(|antenna| antenna.is_none())
    }

    /// Writes `antenna` into the cell. Callers check [`Grid::is_free`] first.
    pub fn set_antenna(&mut self, antenna: usize, row: usize, col: usize) {
        self.antennas[[row, col]] = Some(antenna);
    }

    pub fn clear_antenna(&mut self, row: usize, col: usize) {
        self.antennas[[row, col]] = None;
    }

    pub fn clear_antennas(&mut self) {
        self.antennas.fill(None);
    }

    /// In-bounds cells at Manhattan distance exactly `radius` from
    /// `(row, col)`.
    pub fn ring(&self, row: usize, col: usize, radius: usize) -> RingScan {
        RingScan {
            row: row as i64,
            col: col as i64 - radius as i64,
            radius: radius as i64,
            side: 0,
            taken: 0,
            height: self.height() as i64,
            width: self.width() as i64,
        }
    }

    /// Largest Manhattan distance from `(row, col)` to any cell of the grid.
    pub fn max_reach(&self, row: usize, col: usize) -> usize {
        let rows = row.max(self.height().saturating_sub(1 + row));
        let cols = col.max(self.width().saturating_sub(1 + col));
        rows + cols
    }
}

/// Walks the diamond of cells at a fixed Manhattan distance, starting at the
/// west corner and going north-east, south-east, south-west, north-west.
/// Cells outside the grid are skipped.
#[derive(Debug, Clone)]
pub struct RingScan {
    row: i64,
    col: i64,
    radius: i64,
    side: usize,
    taken: i64,
    height: i64,
    width: i64,
}

impl Iterator for RingScan {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.side < RING_DIRECTIONS.len() {
            let (row, col) = (self.row, self.col);
            if self.radius == 0 {
                self.side = RING_DIRECTIONS.len();
            } else {
                let (d_row, d_col) = RING_DIRECTIONS[self.side];
                self.row += d_row;
                self.col += d_col;
                self.taken += 1;
                if self.taken == self.radius {
                    self.taken = 0;
                    self.side += 1;
                }
            }
            if 0 <= row && row < self.height && 0 <= col && col < self.width {
                return Some((row as usize, col as usize));
            }
        }
        None
    }
}
