//! Planet surface generation library
//!
//! Builds a wrapping grid of tiles from layered noise (height, heat,
//! moisture), then runs features over it: rivers, bodies of water and biomes.

pub mod ascii;
pub mod classification;
pub mod config;
pub mod error;
pub mod features;
pub mod fractal;
pub mod generator;
pub mod map_data;
pub mod properties;
pub mod registry;
pub mod seeds;
pub mod sorter;
pub mod tile;
pub mod tilemap;
pub mod world;

pub use config::GeneratorConfig;
pub use error::{ConfigError, GenerationError, SortError};
pub use generator::PlanetGenerator;
pub use world::{TileInfo, World};
