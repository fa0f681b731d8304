//! Moisture property: a fractal field, wetter over and near water.

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{grid_position, is_registered, PropertyGenerator};
use crate::classification::{classify, is_ascending};
use crate::config::{modifier_for, MoistureConfig};
use crate::fractal::Fractal;
use crate::map_data::MapData;
use crate::sorter::Named;
use crate::tile::{attr, DataBucket, MoistureData, Tile};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoistureBand {
    Dryest,
    Dryer,
    Dry,
    Wet,
    Wetter,
    Wettest,
}

impl MoistureBand {
    pub const ALL: [MoistureBand; 6] = [
        MoistureBand::Dryest,
        MoistureBand::Dryer,
        MoistureBand::Dry,
        MoistureBand::Wet,
        MoistureBand::Wetter,
        MoistureBand::Wettest,
    ];

    /// Row in the biome table
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MoistureBand::Dryest => "Dryest",
            MoistureBand::Dryer => "Dryer",
            MoistureBand::Dry => "Dry",
            MoistureBand::Wet => "Wet",
            MoistureBand::Wetter => "Wetter",
            MoistureBand::Wettest => "Wettest",
        }
    }
}

pub struct MoistureProperty {
    config: MoistureConfig,
    noise: Option<Fractal>,
    map: Option<MapData>,
}

impl MoistureProperty {
    pub fn new(config: MoistureConfig) -> Self {
        Self {
            config,
            noise: None,
            map: None,
        }
    }

    /// Add moisture to a tile that already has a moisture bucket. The value is
    /// capped at 1.0 and the band is recomputed.
    pub fn add_moisture_to_tile(&mut self, tile: &mut Tile, amount: f64) {
        let Some(current) = tile.moisture().map(|m| m.value) else {
            return;
        };
        let (x, y) = grid_position(tile);
        if let Some(map) = self.map.as_mut() {
            map.add(x, y, amount);
        }

        let value = (current + amount).min(1.0);
        if let Some(band) = classify(&self.config.bands, value) {
            tile.set_attribute(
                attr::MOISTURE,
                DataBucket::Moisture(MoistureData {
                    value,
                    band: band.kind,
                }),
            );
        }
    }
}

impl Named for MoistureProperty {
    fn name(&self) -> &str {
        attr::MOISTURE
    }

    fn dependencies(&self) -> Vec<String> {
        vec![attr::HEIGHT.to_string()]
    }
}

impl PropertyGenerator for MoistureProperty {
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
        self.noise.as_ref().map_or(0.0, |n| n.sample(coords))
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
            attr::MOISTURE,
            DataBucket::Moisture(MoistureData {
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
