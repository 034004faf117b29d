use crate::Challenge;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Max, Median, Min};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl Summary {
    /// `None` for an empty sample.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return None;
        }
        let data = Data::new(values);
        Some(Self {
            min: data.min(),
            max: data.max(),
            mean: data.mean()?,
            median: data.median(),
        })
    }
}

/// Shape of an instance: sizes and the distribution of every weight.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InstanceStats {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub num_buildings: usize,
    pub num_antennas: usize,
    pub reward: u32,
    pub antenna_range: Option<Summary>,
    pub antenna_capacity: Option<Summary>,
    pub building_decay: Option<Summary>,
    pub building_value: Option<Summary>,
}

impl InstanceStats {
    pub fn of(challenge: &Challenge) -> Self {
        Self {
            name: challenge.name.clone(),
            width: challenge.width,
            height: challenge.height,
            num_buildings: challenge.num_buildings(),
            num_antennas: challenge.num_antennas(),
            reward: challenge.reward,
            antenna_range: Summary::of(challenge.antennas.iter().map(|a| a.range as f64)),
            antenna_capacity: Summary::of(challenge.antennas.iter().map(|a| a.capacity as f64)),
            building_decay: Summary::of(challenge.buildings.iter().map(|b| b.decay as f64)),
            building_value: Summary::of(challenge.buildings.iter().map(|b| b.value as f64)),
        }
    }
}
