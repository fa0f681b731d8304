//! Height property: the base terrain field that decides land and water.

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{grid_position, PropertyGenerator};
use crate::classification::{classify, is_ascending};
use crate::config::HeightConfig;
use crate::fractal::Fractal;
use crate::map_data::MapData;
use crate::sorter::Named;
use crate::tile::{attr, DataBucket, HeightData, Tile};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeightBand {
    DeepWater,
    MidWater,
    ShallowWater,
    Shoreline,
    Lowlands,
    Midlands,
    Highlands,
    Mountains,
}

impl HeightBand {
    pub fn display_name(&self) -> &'static str {
        match self {
            HeightBand::DeepWater => "Deep Water",
            HeightBand::MidWater => "Mid Water",
            HeightBand::ShallowWater => "Shallow Water",
            HeightBand::Shoreline => "Shoreline",
            HeightBand::Lowlands => "Lowlands",
            HeightBand::Midlands => "Midlands",
            HeightBand::Highlands => "Highlands",
            HeightBand::Mountains => "Mountains",
        }
    }
}

pub struct HeightProperty {
    config: HeightConfig,
    noise: Option<Fractal>,
    map: Option<MapData>,
}

impl HeightProperty {
    pub fn new(config: HeightConfig) -> Self {
        Self {
            config,
            noise: None,
            map: None,
        }
    }
}

impl Named for HeightProperty {
    fn name(&self) -> &str {
        attr::HEIGHT
    }
}

impl PropertyGenerator for HeightProperty {
    fn initialise(&mut self, _registered: &[String]) -> bool {
        is_ascending(&self.config.bands)
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
        let Some(map) = self.map.as_ref() else {
            return;
        };
        let (x, y) = grid_position(tile);
        let value = map.normalized(x, y);
        let Some(band) = classify(&self.config.bands, value) else {
            return;
        };

        tile.set_attribute(
            attr::HEIGHT,
            DataBucket::Height(HeightData {
                value,
                band: band.kind,
                passable: band.passable,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::test_support::{fill_grid, grid};

    #[test]
    fn test_every_tile_gets_a_normalised_height() {
        let mut property = HeightProperty::new(HeightConfig::default());
        assert!(property.initialise(&[]));

        let mut tiles = grid(24, 16);
        fill_grid(&mut property, &mut tiles, 24, 16, 10);

        let values: Vec<f64> = tiles.iter().map(|t| t.height().unwrap().value).collect();
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(values.iter().any(|&v| v == 0.0), "minimum normalises to 0");
        assert!(values.iter().any(|&v| v == 1.0), "maximum normalises to 1");
    }

    #[test]
    fn test_passability_follows_band_table() {
        let mut property = HeightProperty::new(HeightConfig::default());
        let mut tiles = grid(24, 16);
        fill_grid(&mut property, &mut tiles, 24, 16, 3);

        for tile in &tiles {
            let h = tile.height().unwrap();
            let water = matches!(
                h.band,
                HeightBand::DeepWater | HeightBand::MidWater | HeightBand::ShallowWater
            );
            assert_eq!(h.passable, !water, "{:?}", h.band);
        }
    }

    #[test]
    fn test_flat_field_classifies_without_nan() {
        let mut config = HeightConfig::default();
        config.octaves = 0;
        let mut property = HeightProperty::new(config);
        let mut tiles = grid(4, 4);
        fill_grid(&mut property, &mut tiles, 4, 4, 1);

        for tile in &tiles {
            let h = tile.height().unwrap();
            assert_eq!(h.value, 0.0);
            assert_eq!(h.band, HeightBand::DeepWater);
        }
    }

    #[test]
    fn test_unsorted_table_fails_initialise() {
        let mut config = HeightConfig::default();
        config.bands.reverse();
        let mut property = HeightProperty::new(config);
        assert!(!property.initialise(&[]));
    }
}
