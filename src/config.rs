//! Generation parameters and configuration
//!
//! Every section defaults to the stock planet, and every field may be omitted
//! from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classification::Band;
use crate::error::ConfigError;
use crate::fractal::NoiseConfig;
use crate::properties::heat::HeatBand;
use crate::properties::height::HeightBand;
use crate::properties::moisture::MoistureBand;

/// Height-proportional adjustment applied to tiles of one height band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandModifier {
    pub band: HeightBand,
    pub factor: f64,
}

impl BandModifier {
    pub fn new(band: HeightBand, factor: f64) -> Self {
        Self { band, factor }
    }
}

/// Look up the factor for `band`, falling back to `default`.
pub fn modifier_for(modifiers: &[BandModifier], band: HeightBand, default: f64) -> f64 {
    modifiers
        .iter()
        .find(|m| m.band == band)
        .map_or(default, |m| m.factor)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightConfig {
    pub octaves: u32,
    pub frequency: f64,
    pub persistence: f64,
    pub lacunarity: f64,
    /// Ascending thresholds; `passable` marks land
    pub bands: Vec<Band<HeightBand>>,
}

impl Default for HeightConfig {
    fn default() -> Self {
        use HeightBand::*;
        Self {
            octaves: 6,
            frequency: 1.25,
            persistence: 0.5,
            lacunarity: 2.0,
            bands: vec![
                Band::new(DeepWater, 0.1, false),
                Band::new(MidWater, 0.2, false),
                Band::new(ShallowWater, 0.3, false),
                Band::new(Shoreline, 0.4, true),
                Band::new(Lowlands, 0.5, true),
                Band::new(Midlands, 0.65, true),
                Band::new(Highlands, 0.8, true),
                Band::new(Mountains, 0.9, true),
            ],
        }
    }
}

impl HeightConfig {
    /// Fractal settings for this field
    pub fn noise(&self) -> NoiseConfig {
        NoiseConfig {
            octaves: self.octaves,
            frequency: self.frequency,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatConfig {
    pub octaves: u32,
    pub frequency: f64,
    pub persistence: f64,
    pub lacunarity: f64,
    pub bands: Vec<Band<HeatBand>>,
    /// Elevation cooling, as a multiple of normalised height
    pub modifiers: Vec<BandModifier>,
    /// Factor for height bands without an entry in `modifiers`
    pub default_modifier: f64,
}

impl Default for HeatConfig {
    fn default() -> Self {
        use HeatBand::*;
        Self {
            octaves: 4,
            frequency: 3.0,
            persistence: 0.5,
            lacunarity: 2.0,
            bands: vec![
                Band::new(Coldest, 0.05, false),
                Band::new(Colder, 0.18, false),
                Band::new(Cold, 0.4, false),
                Band::new(Warm, 0.6, false),
                Band::new(Warmer, 0.8, false),
                Band::new(Warmest, 1.0, false),
            ],
            modifiers: vec![
                BandModifier::new(HeightBand::Midlands, -0.1),
                BandModifier::new(HeightBand::Highlands, -0.25),
                BandModifier::new(HeightBand::Mountains, -0.4),
            ],
            default_modifier: 0.01,
        }
    }
}

impl HeatConfig {
    /// Fractal settings for this field
    pub fn noise(&self) -> NoiseConfig {
        NoiseConfig {
            octaves: self.octaves,
            frequency: self.frequency,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoistureConfig {
    pub octaves: u32,
    pub frequency: f64,
    pub persistence: f64,
    pub lacunarity: f64,
    pub bands: Vec<Band<MoistureBand>>,
    /// Water-adjacent bonus, as a multiple of normalised height
    pub modifiers: Vec<BandModifier>,
    pub default_modifier: f64,
}

impl Default for MoistureConfig {
    fn default() -> Self {
        use MoistureBand::*;
        Self {
            octaves: 4,
            frequency: 3.0,
            persistence: 0.5,
            lacunarity: 2.0,
            bands: vec![
                Band::new(Dryest, 0.27, false),
                Band::new(Dryer, 0.4, false),
                Band::new(Dry, 0.6, false),
                Band::new(Wet, 0.8, false),
                Band::new(Wetter, 0.9, false),
                Band::new(Wettest, 1.0, false),
            ],
            modifiers: vec![
                BandModifier::new(HeightBand::DeepWater, 8.0),
                BandModifier::new(HeightBand::MidWater, 5.0),
                BandModifier::new(HeightBand::ShallowWater, 3.0),
                BandModifier::new(HeightBand::Shoreline, 1.0),
                BandModifier::new(HeightBand::Lowlands, 0.2),
            ],
            default_modifier: 0.0,
        }
    }
}

impl MoistureConfig {
    /// Fractal settings for this field
    pub fn noise(&self) -> NoiseConfig {
        NoiseConfig {
            octaves: self.octaves,
            frequency: self.frequency,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
        }
    }
}

/// River seeding, validation and carving parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverConfig {
    /// Committed rivers to aim for
    pub river_count: usize,
    /// Minimum normalised height of a river source
    pub min_river_height: f64,
    /// Seeding budget; running out is not an error
    pub max_river_attempts: usize,
    pub min_river_turns: usize,
    pub min_river_length: usize,
    pub max_river_intersections: usize,
    /// Upper bound of the random base radius
    pub max_river_width: usize,
    /// Spacing of radius steps as a fraction of the carved span
    pub buffer_fraction: f64,
    /// Extra tiles either side of the channel used to average the bank height
    pub height_sample_buffer: usize,
    /// Water surface sits this far below the averaged bank height
    pub water_level_below_average: f64,
    /// Reach of the moisture boost around river tiles
    pub moisture_radius: usize,
    /// Boost at distance 1; falls off as 1/distance
    pub moisture_strength: f64,
    /// Random variation of the depth profile across the channel
    pub depth_jitter: f64,
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            river_count: 40,
            min_river_height: 0.6,
            max_river_attempts: 1000,
            min_river_turns: 18,
            min_river_length: 20,
            max_river_intersections: 2,
            max_river_width: 5,
            buffer_fraction: 0.1,
            height_sample_buffer: 2,
            water_level_below_average: 0.005,
            moisture_radius: 60,
            moisture_strength: 0.025,
            depth_jitter: 0.05,
        }
    }
}

impl RiverConfig {
    /// Reject values the carver cannot sample from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("rivers.depth_jitter", self.depth_jitter)?;
        non_negative("rivers.buffer_fraction", self.buffer_fraction)?;
        non_negative("rivers.moisture_strength", self.moisture_strength)?;
        finite("rivers.min_river_height", self.min_river_height)?;
        finite("rivers.water_level_below_average", self.water_level_below_average)
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Invalid { field, value });
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodiesConfig {
    /// Land components smaller than this are islands
    pub island_threshold: usize,
    /// Water components smaller than this are lakes
    pub lake_threshold: usize,
}

impl Default for BodiesConfig {
    fn default() -> Self {
        Self {
            island_threshold: 100,
            lake_threshold: 100,
        }
    }
}

/// All tunables for one planet
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub height: HeightConfig,
    pub heat: HeatConfig,
    pub moisture: MoistureConfig,
    pub rivers: RiverConfig,
    pub bodies: BodiesConfig,
}

impl GeneratorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rivers.validate()
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
