//! Biome classification from heat and moisture bands.

use std::any::Any;

use log::{info, warn};
use serde::Serialize;

use super::{FeatureContext, FeatureGenerator};
use crate::properties::heat::HeatBand;
use crate::properties::moisture::MoistureBand;
use crate::sorter::Named;
use crate::tile::{attr, BiomeData, DataBucket, Tile};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Biome {
    Desert,
    Savanna,
    TropicalRainforest,
    Grassland,
    Woodland,
    SeasonalForest,
    TemperateRainforest,
    BorealForest,
    Tundra,
    Ice,
}

impl Biome {
    pub const ALL: [Biome; 10] = [
        Biome::Desert,
        Biome::Savanna,
        Biome::TropicalRainforest,
        Biome::Grassland,
        Biome::Woodland,
        Biome::SeasonalForest,
        Biome::TemperateRainforest,
        Biome::BorealForest,
        Biome::Tundra,
        Biome::Ice,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Biome::Desert => "Desert",
            Biome::Savanna => "Savanna",
            Biome::TropicalRainforest => "Tropical Rainforest",
            Biome::Grassland => "Grassland",
            Biome::Woodland => "Woodland",
            Biome::SeasonalForest => "Seasonal Forest",
            Biome::TemperateRainforest => "Temperate Rainforest",
            Biome::BorealForest => "Boreal Forest",
            Biome::Tundra => "Tundra",
            Biome::Ice => "Ice",
        }
    }

    /// Look up the biome for a moisture and heat band.
    pub fn lookup(moisture: MoistureBand, heat: HeatBand) -> Biome {
        BIOME_TABLE[moisture.index()][heat.index()]
    }
}

use Biome::*;

/// Rows are moisture (driest first), columns heat (coldest first).
const BIOME_TABLE: [[Biome; 6]; 6] = [
    [Ice, Tundra, Grassland, Desert, Desert, Desert],
    [Ice, Tundra, Grassland, Desert, Desert, Desert],
    [Ice, Tundra, Woodland, Woodland, Savanna, Savanna],
    [Ice, Tundra, BorealForest, Woodland, Savanna, Savanna],
    [Ice, Tundra, BorealForest, SeasonalForest, TropicalRainforest, TropicalRainforest],
    [Ice, Tundra, BorealForest, TemperateRainforest, TropicalRainforest, TropicalRainforest],
];

/// Biome for a tile, if it is passable and has both climate bands.
pub fn biome_for_tile(tile: &Tile) -> Option<Biome> {
    if !tile.is_passable() {
        return None;
    }
    let heat = tile.heat()?;
    let moisture = tile.moisture()?;
    Some(Biome::lookup(moisture.band, heat.band))
}

#[derive(Default)]
pub struct Biomes {
    assigned: usize,
}

impl Biomes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiles given a biome in the last run.
    pub fn assigned(&self) -> usize {
        self.assigned
    }
}

impl Named for Biomes {
    fn name(&self) -> &str {
        attr::BIOMES
    }

    fn dependencies(&self) -> Vec<String> {
        vec![attr::RIVERS.to_string()]
    }
}

impl FeatureGenerator for Biomes {
    fn generate(&mut self, ctx: &mut FeatureContext<'_>) -> bool {
        if !ctx.has_property(attr::HEAT) || !ctx.has_property(attr::MOISTURE) {
            warn!("Biomes need the heat and moisture properties");
            return false;
        }

        self.assigned = 0;
        for tile in ctx.world.tiles_mut() {
            if let Some(biome) = biome_for_tile(tile) {
                tile.set_attribute(attr::BIOMES, DataBucket::Biome(BiomeData { biome }));
                self.assigned += 1;
            }
        }

        ctx.world.update_bitmasks(
            attr::BIOMES,
            |tile| tile.biome().is_some(),
            |a, b| a.biome() == b.biome(),
        );

        info!("Biomes assigned to {} tiles", self.assigned);
        true
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
    use crate::config::{HeatConfig, HeightConfig, MoistureConfig};
    use crate::features::rivers::test_support::world_from;
    use crate::properties::{HeatProperty, HeightProperty, MoistureProperty, PropertyGenerator};
    use crate::registry::Registry;
    use crate::tile::{HeatData, MoistureData};
    use crate::world::World;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn with_climate(world: &mut World, heat: HeatBand, moisture: MoistureBand) {
        for tile in world.tiles_mut() {
            tile.set_attribute(attr::HEAT, DataBucket::Heat(HeatData { value: 0.5, band: heat }));
            tile.set_attribute(
                attr::MOISTURE,
                DataBucket::Moisture(MoistureData {
                    value: 0.5,
                    band: moisture,
                }),
            );
        }
    }

    fn properties(with_heat: bool) -> Registry<dyn PropertyGenerator> {
        let mut props: Registry<dyn PropertyGenerator> = Registry::new();
        props
            .register(Box::new(HeightProperty::new(HeightConfig::default())))
            .unwrap();
        if with_heat {
            props
                .register(Box::new(HeatProperty::new(HeatConfig::default())))
                .unwrap();
        }
        props
            .register(Box::new(MoistureProperty::new(MoistureConfig::default())))
            .unwrap();
        props
    }

    #[test]
    fn test_table_is_total() {
        let mut seen = HashSet::new();
        for m in MoistureBand::ALL {
            for h in HeatBand::ALL {
                seen.insert(Biome::lookup(m, h));
            }
        }
        assert_eq!(seen.len(), Biome::ALL.len(), "every biome is reachable");
    }

    #[test]
    fn test_table_corners() {
        assert_eq!(Biome::lookup(MoistureBand::Dryest, HeatBand::Coldest), Biome::Ice);
        assert_eq!(Biome::lookup(MoistureBand::Dryest, HeatBand::Warmest), Biome::Desert);
        assert_eq!(Biome::lookup(MoistureBand::Wettest, HeatBand::Warm), Biome::TemperateRainforest);
        assert_eq!(Biome::lookup(MoistureBand::Wetter, HeatBand::Warm), Biome::SeasonalForest);
        assert_eq!(
            Biome::lookup(MoistureBand::Wettest, HeatBand::Warmest),
            Biome::TropicalRainforest
        );
    }

    #[test]
    fn test_only_land_gets_biomes() {
        let mut world = world_from(8, 8, |x, _| if x < 4 { 0.7 } else { 0.1 });
        with_climate(&mut world, HeatBand::Warm, MoistureBand::Wet);
        let mut props = properties(true);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut biomes = Biomes::new();

        assert!(biomes.generate(&mut FeatureContext {
            world: &mut world,
            properties: &mut props,
            rng: &mut rng,
        }));
        assert_eq!(biomes.assigned(), 32);
        assert_eq!(world.tile(1, 1).biome(), Some(Biome::Woodland));
        assert_eq!(world.tile(6, 1).biome(), None);

        // interior land tile: above and below match, left wraps to water
        assert_eq!(world.tile(1, 3).bitmask(attr::BIOMES), Some(1 | 2 | 4 | 8));
        assert_eq!(world.tile(0, 3).bitmask(attr::BIOMES), Some(1 | 2 | 4));
        assert_eq!(world.tile(3, 3).bitmask(attr::BIOMES), Some(1 | 4 | 8));
        assert_eq!(world.tile(5, 3).bitmask(attr::BIOMES), None);
    }

    #[test]
    fn test_missing_heat_reports_false() {
        let mut world = world_from(4, 4, |_, _| 0.7);
        let mut props = properties(false);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut biomes = Biomes::new();
        assert!(!biomes.generate(&mut FeatureContext {
            world: &mut world,
            properties: &mut props,
            rng: &mut rng,
        }));
        assert!(world.tiles().all(|t| t.biome().is_none()));
    }
}
