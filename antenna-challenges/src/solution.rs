use crate::instance::Fields;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedAntenna {
    pub antenna: usize,
    pub row: usize,
    pub col: usize,
}

/// Final antenna positions, as written to and read from solution files:
///
/// ```text
/// M
/// index col row   (M lines)
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    pub antennas: Vec<PlacedAntenna>,
}

impl Solution {
    pub fn new() -> Self {
        Self {
            antennas: Vec::new(),
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut fields = Fields::new(text);
        let [count] = fields.next_record("antenna count")?;
        let antennas = (0..count)
            .map(|i| {
                let [antenna, col, row] = fields.next_record(&format!("placement {}", i))?;
                Ok(PlacedAntenna {
                    antenna: antenna as usize,
                    row: row as usize,
                    col: col as usize,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        fields.finish()?;
        Ok(Self { antennas })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read solution {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid solution {}", path.display()))
    }

    /// `<instance>-<score>`, the name a solution is dumped under.
    pub fn file_name(instance_name: &str, score: i64) -> Result<String> {
        if instance_name.is_empty() {
            return Err(anyhow!("Instance has no name to derive a solution file from"));
        }
        Ok(format!("{}-{}", instance_name, score))
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.antennas.len())?;
        for placed in &self.antennas {
            writeln!(f, "{} {} {}", placed.antenna, placed.col, placed.row)?;
        }
        Ok(())
    }
}
