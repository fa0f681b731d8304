//! ASCII rendering of generated worlds
//!
//! One character per tile, one line per row. Used by the CLI for quick looks
//! at a world without any graphics.

use std::fmt;
use std::str::FromStr;

use crate::features::{Biome, BodyKind};
use crate::properties::heat::HeatBand;
use crate::properties::height::HeightBand;
use crate::properties::moisture::MoistureBand;
use crate::tile::Tile;
use crate::world::World;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Biome characters, rivers drawn on top
    Biome,
    /// Height bands
    Height,
    /// Heat bands
    Heat,
    /// Moisture bands
    Moisture,
    /// Continent, island, lake and ocean membership
    Bodies,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Biome => "Biome",
            AsciiMode::Height => "Height",
            AsciiMode::Heat => "Heat",
            AsciiMode::Moisture => "Moisture",
            AsciiMode::Bodies => "Bodies",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[
            AsciiMode::Biome,
            AsciiMode::Height,
            AsciiMode::Heat,
            AsciiMode::Moisture,
            AsciiMode::Bodies,
        ]
    }
}

impl fmt::Display for AsciiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AsciiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AsciiMode::all()
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = AsciiMode::all().iter().map(|m| m.name()).collect();
                format!("unknown mode '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

pub const RIVER_CHAR: char = '~';
pub const WATER_CHAR: char = '.';

/// Get ASCII character for a biome
pub fn biome_char(biome: Biome) -> char {
    match biome {
        Biome::Ice => '#',
        Biome::Tundra => ':',
        Biome::BorealForest => 'B',
        Biome::Grassland => '"',
        Biome::Woodland => 'w',
        Biome::SeasonalForest => 'T',
        Biome::TemperateRainforest => 'R',
        Biome::Desert => 'd',
        Biome::Savanna => ';',
        Biome::TropicalRainforest => 'r',
    }
}

pub fn height_char(band: HeightBand) -> char {
    match band {
        HeightBand::DeepWater => ' ',
        HeightBand::MidWater => '.',
        HeightBand::ShallowWater => ',',
        HeightBand::Shoreline => '-',
        HeightBand::Lowlands => '=',
        HeightBand::Midlands => '+',
        HeightBand::Highlands => '*',
        HeightBand::Mountains => '^',
    }
}

pub fn heat_char(band: HeatBand) -> char {
    const CHARS: [char; 6] = ['#', '=', '-', '.', '+', '@'];
    CHARS[band.index()]
}

pub fn moisture_char(band: MoistureBand) -> char {
    const CHARS: [char; 6] = ['_', '.', '-', ':', '=', '%'];
    CHARS[band.index()]
}

pub fn body_char(kind: BodyKind) -> char {
    match kind {
        BodyKind::Continent => '#',
        BodyKind::Island => 'i',
        BodyKind::Lake => 'o',
        BodyKind::Ocean => '.',
    }
}

/// Character for one tile; '?' where the attribute for `mode` is missing.
pub fn tile_char(tile: &Tile, mode: AsciiMode) -> char {
    match mode {
        AsciiMode::Biome => {
            if tile.river().is_some() {
                RIVER_CHAR
            } else if !tile.is_passable() {
                WATER_CHAR
            } else {
                tile.biome().map_or('?', biome_char)
            }
        }
        AsciiMode::Height => tile.height().map_or('?', |h| height_char(h.band)),
        AsciiMode::Heat => tile.heat().map_or('?', |h| heat_char(h.band)),
        AsciiMode::Moisture => tile.moisture().map_or('?', |m| moisture_char(m.band)),
        AsciiMode::Bodies => tile.body().map_or('?', |b| body_char(b.kind)),
    }
}

/// Render a world to an ASCII string
pub fn render_ascii_map(world: &World, mode: AsciiMode) -> String {
    let width = world.width();
    let height = world.height();
    let mut result = String::with_capacity((width + 1) * height);

    for y in 0..height {
        for x in 0..width {
            result.push(tile_char(world.tile(x as i32, y as i32), mode));
        }
        result.push('\n');
    }

    result
}

/// Legend for a rendering mode
pub fn legend(mode: AsciiMode) -> String {
    let mut legend = format!("=== {} LEGEND ===\n", mode.name().to_uppercase());
    let entries: Vec<(char, &str)> = match mode {
        AsciiMode::Biome => {
            let mut entries = vec![(WATER_CHAR, "Water"), (RIVER_CHAR, "River")];
            entries.extend(Biome::ALL.iter().map(|b| (biome_char(*b), b.display_name())));
            entries
        }
        AsciiMode::Height => [
            HeightBand::DeepWater,
            HeightBand::MidWater,
            HeightBand::ShallowWater,
            HeightBand::Shoreline,
            HeightBand::Lowlands,
            HeightBand::Midlands,
            HeightBand::Highlands,
            HeightBand::Mountains,
        ]
        .iter()
        .map(|b| (height_char(*b), b.display_name()))
        .collect(),
        AsciiMode::Heat => HeatBand::ALL
            .iter()
            .map(|b| (heat_char(*b), b.display_name()))
            .collect(),
        AsciiMode::Moisture => MoistureBand::ALL
            .iter()
            .map(|b| (moisture_char(*b), b.display_name()))
            .collect(),
        AsciiMode::Bodies => [BodyKind::Continent, BodyKind::Island, BodyKind::Lake, BodyKind::Ocean]
            .iter()
            .map(|k| (body_char(*k), k.display_name()))
            .collect(),
    };

    for (ch, name) in entries {
        legend.push_str(&format!("  '{}' {}\n", ch, name));
    }
    legend
}

/// Tile count per biome, in `Biome::ALL` order.
pub fn biome_counts(world: &World) -> Vec<(Biome, usize)> {
    Biome::ALL
        .iter()
        .map(|&biome| {
            let count = world.tiles().filter(|t| t.biome() == Some(biome)).count();
            (biome, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::rivers::test_support::world_from;
    use crate::tile::{attr, BiomeData, DataBucket, Direction, RiverData};

    #[test]
    fn test_mode_names_parse() {
        for mode in AsciiMode::all() {
            assert_eq!(mode.name().to_lowercase().parse::<AsciiMode>(), Ok(*mode));
        }
        assert!("plates".parse::<AsciiMode>().is_err());
    }

    #[test]
    fn test_render_dimensions() {
        let world = world_from(7, 3, |x, _| if x < 3 { 0.7 } else { 0.1 });
        let text = render_ascii_map(&world, AsciiMode::Height);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() == 7));
        assert_eq!(lines[0], "===    ");
    }

    #[test]
    fn test_biome_mode_draws_rivers_over_land() {
        let mut world = world_from(3, 1, |x, _| if x < 2 { 0.7 } else { 0.1 });
        world.tile_mut(0, 0).set_attribute(
            attr::BIOMES,
            DataBucket::Biome(BiomeData {
                biome: Biome::Desert,
            }),
        );
        world.tile_mut(1, 0).set_attribute(
            attr::RIVERS,
            DataBucket::River(RiverData {
                tree: 0,
                river: 0,
                water_level: 0.6,
                floor: 0.55,
                flow: Direction::Right,
            }),
        );
        assert_eq!(render_ascii_map(&world, AsciiMode::Biome), "d~.\n");
        assert_eq!(render_ascii_map(&world, AsciiMode::Heat), "???\n");
    }

    #[test]
    fn test_legend_lists_every_biome() {
        let text = legend(AsciiMode::Biome);
        for biome in Biome::ALL {
            assert!(text.contains(biome.display_name()), "missing {:?}", biome);
        }
    }
}
