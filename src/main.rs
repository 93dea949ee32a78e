use clap::Parser;

use world_engine::engine::WorldEngine;
use world_engine::erosion::ErosionParams;
use world_engine::export;
use world_engine::terrain::IslandMode;

#[derive(Parser, Debug)]
#[command(name = "world_engine")]
#[command(about = "Generate a procedural world and simulate settlements on it")]
struct Args {
    /// Width of the world in tiles
    #[arg(short = 'W', long, default_value = "300")]
    width: usize,

    /// Height of the world in tiles
    #[arg(short = 'H', long, default_value = "200")]
    height: usize,

    /// Random seed (derived from the current time if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Generate an archipelago instead of a single island
    #[arg(long)]
    archipelago: bool,

    /// Number of erosion particles
    #[arg(long, default_value = "200000")]
    erosion_particles: usize,

    /// Skip the erosion pass
    #[arg(long)]
    skip_erosion: bool,

    /// Years of civilization to simulate
    #[arg(short, long, default_value = "100")]
    years: u32,

    /// Export map views as PNG files with this path prefix
    #[arg(long)]
    export: Option<String>,

    /// Write a JSON world summary to this path
    #[arg(long)]
    summary: Option<String>,
}

fn main() {
    let args = Args::parse();

    let seed = args
        .seed
        .unwrap_or_else(|| chrono::Utc::now().timestamp() as u64);
    let mode = if args.archipelago {
        IslandMode::Archipelago
    } else {
        IslandMode::Single
    };

    println!("Generating world with seed: {} ({})", seed, mode);
    println!("Map size: {}x{}", args.width, args.height);

    let mut engine = WorldEngine::new(args.width, args.height);
    engine.generate_terrain(seed, mode);

    let land = count_land(&engine);
    println!(
        "Terrain generated: {:.1}% land",
        100.0 * land as f64 / (args.width * args.height) as f64
    );

    if !args.skip_erosion {
        println!("Eroding with {} particles...", args.erosion_particles);
        if let Some(stats) = engine.apply_erosion(args.erosion_particles, &ErosionParams::dramatic()) {
            println!(
                "Erosion complete: {} particles traced, {:.2} eroded, {:.2} deposited",
                stats.particles_traced, stats.total_eroded, stats.total_deposited
            );
        }
    }

    println!("Generating climate...");
    engine.generate_climate();

    println!("Initializing civilization...");
    engine.initialize_civilization();
    println!(
        "Civilization started with {} cities and {} roads",
        engine.cities().len(),
        engine.roads().len()
    );
    for city in engine.cities() {
        println!("  Founded {} at ({}, {})", city.name, city.x, city.y);
    }

    for year in 1..=args.years {
        engine.advance_year();
        if year % 10 == 0 || year == args.years {
            println!(
                "Year {} - population {} in {} cities",
                engine.year(),
                engine.total_population(),
                engine.cities().len()
            );
        }
    }

    if let Some(prefix) = &args.export {
        println!("Exporting maps to {}_*.png", prefix);
        if let Err(e) = export::export_all_maps(&engine, prefix) {
            eprintln!("Map export failed: {}", e);
        }
    }

    if let Some(path) = &args.summary {
        println!("Writing summary to {}", path);
        if let Err(e) = export::export_summary(&engine, path) {
            eprintln!("Summary export failed: {}", e);
        }
    }
}

fn count_land(engine: &WorldEngine) -> usize {
    let mut land = 0;
    for y in 0..engine.height() {
        for x in 0..engine.width() {
            if engine.elevation(x as i32, y as i32) > 0.0 {
                land += 1;
            }
        }
    }
    land
}
