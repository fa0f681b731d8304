use std::path::PathBuf;
use std::process;

use clap::Parser;

use planet_surface::ascii::{self, AsciiMode};
use planet_surface::features::{BodiesOfWater, Rivers};
use planet_surface::seeds::WorldSeeds;
use planet_surface::{GeneratorConfig, PlanetGenerator};

#[derive(Parser, Debug)]
#[command(name = "planet_surface")]
#[command(about = "Generate a wrapping planet surface with rivers, bodies of water and biomes")]
struct Args {
    /// Width of the tile grid
    #[arg(short = 'W', long, default_value = "128")]
    width: usize,

    /// Height of the tile grid
    #[arg(short = 'H', long, default_value = "128")]
    height: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the height noise seed
    #[arg(long)]
    height_seed: Option<u64>,

    /// Override the heat noise seed
    #[arg(long)]
    heat_seed: Option<u64>,

    /// Override the moisture noise seed
    #[arg(long)]
    moisture_seed: Option<u64>,

    /// Override the seed of the feature random stream (river sites, widths)
    #[arg(long)]
    rivers_seed: Option<u64>,

    /// JSON configuration file; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the map as ASCII (biome, height, heat, moisture, bodies)
    #[arg(long)]
    ascii: Option<AsciiMode>,

    /// Print the legend for the ASCII mode
    #[arg(long)]
    legend: bool,

    /// Print one tile as JSON, e.g. "10,20"
    #[arg(long, value_parser = parse_coords)]
    tile: Option<(i32, i32)>,

    /// Skip a registered generator by name (repeatable)
    #[arg(long = "disable")]
    disable: Vec<String>,
}

fn parse_coords(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad X '{}': {}", x, e))?;
    let y = y.trim().parse().map_err(|e| format!("bad Y '{}': {}", y, e))?;
    Ok((x, y))
}

/// Master-derived seeds with any per-system overrides applied.
fn world_seeds(args: &Args, master: u64) -> WorldSeeds {
    let mut builder = WorldSeeds::builder(master);
    if let Some(seed) = args.height_seed {
        builder = builder.height(seed);
    }
    if let Some(seed) = args.heat_seed {
        builder = builder.heat(seed);
    }
    if let Some(seed) = args.moisture_seed {
        builder = builder.moisture(seed);
    }
    if let Some(seed) = args.rivers_seed {
        builder = builder.rivers(seed);
    }
    builder.build()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match GeneratorConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => GeneratorConfig::default(),
    };

    if args.dump_config {
        match config.to_json_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialise config: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    println!("Generating planet surface with seed: {}", seed);
    println!("Map size: {}x{}", args.width, args.height);

    let mut generator = match PlanetGenerator::with_default_generators(config) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    for name in &args.disable {
        if let Err(e) = generator.unregister(name) {
            eprintln!("{}", e);
            process::exit(2);
        }
    }

    let seeds = world_seeds(&args, seed);
    if let Err(e) = generator.generate_with_seeds(seeds, args.width, args.height) {
        eprintln!("Generation failed: {}", e);
        process::exit(1);
    }
    let Some(world) = generator.world() else {
        eprintln!("Generation produced no world");
        process::exit(1);
    };

    let tiles = world.width() * world.height();
    let land = world.tiles().filter(|t| t.is_passable()).count();
    println!(
        "Land: {} tiles ({:.1}%)",
        land,
        100.0 * land as f64 / tiles as f64
    );

    if let Some(rivers) = generator.feature::<Rivers>("rivers") {
        let stats = rivers.stats();
        println!(
            "Rivers: {} committed, {} discarded, {} attempts, {} trees, {} carved tiles",
            stats.committed, stats.discarded, stats.attempts, stats.trees, stats.carved_tiles
        );
    }

    if let Some(bodies) = generator.feature::<BodiesOfWater>("bodies") {
        let stats = bodies.stats();
        println!(
            "Bodies: {} continents, {} islands, {} oceans, {} lakes",
            stats.continents, stats.islands, stats.oceans, stats.lakes
        );
    }

    for (biome, count) in ascii::biome_counts(world) {
        if count > 0 {
            println!("  {:<22} {:>6}", biome.display_name(), count);
        }
    }

    if let Some(mode) = args.ascii {
        println!();
        print!("{}", ascii::render_ascii_map(world, mode));
        if args.legend {
            print!("{}", ascii::legend(mode));
        }
    }

    if let Some((x, y)) = args.tile {
        let info = world.tile_info(x, y);
        println!();
        println!("Tile ({}, {})", info.x, info.y);
        println!("  Height: {}", info.height_str());
        println!("  Body:   {}", info.body_str());
        println!("  River:  {}", info.river_str());
        match serde_json::to_string_pretty(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialise tile: {}", e),
        }
    }
}
