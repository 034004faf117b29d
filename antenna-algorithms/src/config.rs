use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Hyperparameters {
    /// Number of perturbation rounds, skipped rounds included.
    pub iterations: usize,
    pub seed: u64,
    /// Hill climbing: a draw below this jumps to a uniformly random cell.
    pub random_cell_threshold: f64,
    /// Hill climbing: a draw below this (and not below
    /// `random_cell_threshold`) jumps onto a random building. Equal
    /// thresholds disable building jumps.
    pub building_threshold: f64,
    /// Hill climbing: largest per-axis shift of a local move.
    pub max_offset: usize,
    /// Grid descent: stride between candidate rows and columns.
    pub step: usize,
    /// Window descent: side of the candidate window.
    pub window_size: usize,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            iterations: 100,
            seed: 0,
            random_cell_threshold: 0.1,
            building_threshold: 0.1,
            max_offset: 10,
            step: 10,
            window_size: 50,
        }
    }
}

impl Hyperparameters {
    /// Defaults overridden by the recognised keys of `hyperparameters`.
    /// Unknown keys are ignored.
    pub fn initialize(hyperparameters: &Option<Map<String, Value>>) -> Result<Self> {
        let mut merged_params = serde_json::to_value(Self::default())?;
        if let (Value::Object(ref mut obj), Some(map)) = (&mut merged_params, hyperparameters) {
            for (k, v) in map {
                if obj.contains_key(k) {
                    obj.insert(k.clone(), v.clone());
                }
            }
        }
        let params: Self = serde_json::from_value(merged_params)
            .map_err(|e| anyhow!("Invalid hyperparameters: {}", e))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, threshold) in [
            ("random_cell_threshold", self.random_cell_threshold),
            ("building_threshold", self.building_threshold),
        ] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(anyhow!("{} must be within [0, 1], got {}", name, threshold));
            }
        }
        if i64::try_from(self.max_offset).is_err() {
            return Err(anyhow!(
                "max_offset must be at most {}, got {}",
                i64::MAX,
                self.max_offset
            ));
        }
        if self.step == 0 {
            return Err(anyhow!("step must be positive"));
        }
        if self.window_size == 0 {
            return Err(anyhow!("window_size must be positive"));
        }
        Ok(())
    }

    pub fn rng(&self) -> SmallRng {
        SmallRng::seed_from_u64(self.seed)
    }
}
