//! Heat property: a latitude gradient times a fractal, cooled by elevation.

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{grid_position, is_registered, PropertyGenerator};
use crate::classification::{classify, is_ascending};
use crate::config::{modifier_for, HeatConfig};
use crate::fractal::{latitude_gradient, Fractal};
use crate::map_data::MapData;
use crate::sorter::Named;
use crate::tile::{attr, DataBucket, HeatData, Tile};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeatBand {
    Coldest,
    Colder,
    Cold,
    Warm,
    Warmer,
    Warmest,
}

impl HeatBand {
    pub const ALL: [HeatBand; 6] = [
        HeatBand::Coldest,
        HeatBand::Colder,
        HeatBand::Cold,
        HeatBand::Warm,
        HeatBand::Warmer,
        HeatBand::Warmest,
    ];

    /// Column in the biome table
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            HeatBand::Coldest => "Coldest",
            HeatBand::Colder => "Colder",
            HeatBand::Cold => "Cold",
            HeatBand::Warm => "Warm",
            HeatBand::Warmer => "Warmer",
            HeatBand::Warmest => "Warmest",
        }
    }
}

pub struct HeatProperty {
    config: HeatConfig,
    noise: Option<Fractal>,
    map: Option<MapData>,
}

impl HeatProperty {
    pub fn new(config: HeatConfig) -> Self {
        Self {
            config,
            noise: None,
            map: None,
        }
    }
}

impl Named for HeatProperty {
    fn name(&self) -> &str {
        attr::HEAT
    }

    fn dependencies(&self) -> Vec<String> {
        vec![attr::HEIGHT.to_string()]
    }
}

impl PropertyGenerator for HeatProperty {
    fn initialise(&mut self, registered: &[String]) -> bool {
        is_ascending(&self.config.bands) && is_registered(registered, attr::HEIGHT)
    }

    fn generate_noise(&mut self, seed: u64) {
        self.noise = Some(Fractal::new(seed, &self.config.noise()));
    }

    fn preallocate_map_data(&mut self, width: usize, height: usize) {
        self.map = Some(MapData::new(width, height));
    }

    fn sample_noise(&self, coords: [f64; 4]) -> f64 {
        let fractal = self.noise.as_ref().map_or(0.0, |n| n.sample_unit(coords));
        latitude_gradient(&coords) * fractal
    }

    fn map_data(&self) -> Option<&MapData> {
        self.map.as_ref()
    }

    fn map_data_mut(&mut self) -> Option<&mut MapData> {
        self.map.as_mut()
    }

    fn generate_tile(&mut self, tile: &mut Tile) {
        let Some(height) = tile.height().copied() else {
            return;
        };
        let Some(map) = self.map.as_mut() else {
            return;
        };

        let (x, y) = grid_position(tile);
        let factor = modifier_for(
            &self.config.modifiers,
            height.band,
            self.config.default_modifier,
        );
        let raw = map.value(x, y) + factor * height.value;
        map.set(x, y, raw);

        let value = map.normalize(raw).clamp(0.0, 1.0);
        let Some(band) = classify(&self.config.bands, value) else {
            return;
        };

        tile.set_attribute(
            attr::HEAT,
            DataBucket::Heat(HeatData {
                value,
                band: band.kind,
            }),
        );
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
