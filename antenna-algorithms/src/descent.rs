use anyhow::Result;
use antenna_challenges::{Delta, Placement};
use std::ops::Range;

/// Outcome of re-seating one antenna.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub antenna: usize,
    pub from: (usize, usize),
    pub to: (usize, usize),
    pub delta: Delta,
}

/// Lifts `antenna` off the grid, evaluates every free cell of `rows × cols`
/// against the remaining antennas and puts it back on the first cell with
/// the strictly highest positive gain. Without any positive gain it goes
/// back to the cell it came from.
pub(crate) fn reseat<I, J>(
    placement: &mut Placement,
    antenna: usize,
    rows: I,
    cols: J,
) -> Result<Move>
where
    I: Iterator<Item = usize>,
    J: Iterator<Item = usize> + Clone,
{
    let mut probe = placement.begin_probe(antenna)?;
    let from = probe.origin();

    let mut best = None;
    let mut best_gain = 0;
    for row in rows {
        for col in cols.clone() {
            if !probe.is_free(row, col) {
                continue;
            }
            let delta = probe.delta(row, col);
            if delta.score > best_gain {
                best_gain = delta.score;
                best = Some((row, col));
            }
        }
    }

    let to = best.unwrap_or(from);
    let delta = probe.commit(to.0, to.1)?;
    Ok(Move {
        antenna,
        from,
        to,
        delta,
    })
}

/// Half-open `[center - size / 2, center + size)` clipped to `[0, len)`.
pub(crate) fn window(center: usize, size: usize, len: usize) -> Range<usize> {
    center.saturating_sub(size / 2)..center.saturating_add(size).min(len)
}
