//! Map export to PNG plus a JSON world summary.
//!
//! The engine has no interactive display; these exports are how a generated
//! world gets inspected. Each view mirrors one of the query surfaces:
//! terrain, raw heightmap, biomes, temperature, moisture, civilization
//! overlay, territory, and development.

use std::error::Error;
use std::fs::File;
use std::path::Path;

use image::{Rgb, RgbImage};
use serde::Serialize;

use crate::civilization::{City, CivilizationSim};
use crate::engine::WorldEngine;

/// Road color for the civilization overlay
const ROAD_COLOR: Rgb<u8> = Rgb([101, 67, 33]);

/// City marker color
const CITY_COLOR: Rgb<u8> = Rgb([40, 30, 20]);

/// Per-city territory tint palette, cycled by city index
const TERRITORY_COLORS: [(u8, u8, u8); 8] = [
    (255, 0, 0),
    (0, 0, 255),
    (0, 255, 0),
    (255, 255, 0),
    (255, 0, 255),
    (0, 255, 255),
    (255, 128, 0),
    (128, 0, 255),
];

/// Export every view the engine currently has data for. Files are written as
/// `<prefix>_<view>.png`.
pub fn export_all_maps(engine: &WorldEngine, prefix: &str) -> Result<(), Box<dyn Error>> {
    export_terrain_map(engine, &format!("{}_terrain.png", prefix))?;
    export_heightmap(engine, &format!("{}_heightmap.png", prefix))?;

    if engine.climate_data().is_some() {
        export_biome_map(engine, &format!("{}_biomes.png", prefix))?;
        export_temperature_map(engine, &format!("{}_temperature.png", prefix))?;
        export_moisture_map(engine, &format!("{}_moisture.png", prefix))?;
    }

    if let Some(civ) = engine.civilization() {
        export_civilization_map(engine, civ, &format!("{}_civilization.png", prefix))?;
        export_territory_map(engine, civ, &format!("{}_territory.png", prefix))?;
        export_development_map(engine, civ, &format!("{}_development.png", prefix))?;
    }

    Ok(())
}

/// Terrain classification view
pub fn export_terrain_map(engine: &WorldEngine, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let img = render_cells(engine, |x, y| {
        let (r, g, b) = engine.terrain(x as i32, y as i32).color();
        Rgb([r, g, b])
    });
    img.save(path)?;
    Ok(())
}

/// Grayscale heightmap view
pub fn export_heightmap(engine: &WorldEngine, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let img = render_cells(engine, |x, y| {
        let e = engine.elevation(x as i32, y as i32);
        let gray = (((e + 1.0) * 0.5) * 255.0).clamp(0.0, 255.0) as u8;
        Rgb([gray, gray, gray])
    });
    img.save(path)?;
    Ok(())
}

/// Biome view
pub fn export_biome_map(engine: &WorldEngine, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let img = render_cells(engine, |x, y| {
        let (r, g, b) = engine.biome(x as i32, y as i32).color();
        Rgb([r, g, b])
    });
    img.save(path)?;
    Ok(())
}

/// Temperature view: blue through white to red over roughly -10..30 Celsius
pub fn export_temperature_map(engine: &WorldEngine, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let img = render_cells(engine, |x, y| {
        let t = engine.temperature(x as i32, y as i32);
        let normalized = ((t + 10.0) / 40.0).clamp(0.0, 1.0);
        if normalized < 0.5 {
            let f = normalized * 2.0;
            Rgb([(50.0 + 205.0 * f) as u8, (50.0 + 205.0 * f) as u8, 255])
        } else {
            let f = (normalized - 0.5) * 2.0;
            Rgb([255, (255.0 - 205.0 * f) as u8, (255.0 - 205.0 * f) as u8])
        }
    });
    img.save(path)?;
    Ok(())
}

/// Moisture view: brown (dry) to blue (wet)
pub fn export_moisture_map(engine: &WorldEngine, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let img = render_cells(engine, |x, y| {
        let m = engine.moisture(x as i32, y as i32);
        Rgb([
            (139.0 * (1.0 - m)) as u8,
            (90.0 * (1.0 - m) + 90.0 * m) as u8,
            (50.0 + 205.0 * m) as u8,
        ])
    });
    img.save(path)?;
    Ok(())
}

/// Biome base with roads and city markers drawn on top
pub fn export_civilization_map(
    engine: &WorldEngine,
    civ: &CivilizationSim,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let mut img = render_cells(engine, |x, y| {
        let (r, g, b) = engine.biome(x as i32, y as i32).color();
        Rgb([r, g, b])
    });

    for road in civ.roads() {
        for &(x, y) in &road.path {
            img.put_pixel(x as u32, y as u32, ROAD_COLOR);
        }
    }

    for city in civ.cities() {
        draw_city_marker(&mut img, city);
    }

    img.save(path)?;
    Ok(())
}

/// Terrain base tinted by territory owner
pub fn export_territory_map(
    engine: &WorldEngine,
    civ: &CivilizationSim,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let img = render_cells(engine, |x, y| {
        let (r, g, b) = engine.terrain(x as i32, y as i32).color();
        match civ.territory_owner(x as i32, y as i32) {
            Some(owner) => {
                let tint = TERRITORY_COLORS[owner % TERRITORY_COLORS.len()];
                Rgb([blend(r, tint.0), blend(g, tint.1), blend(b, tint.2)])
            }
            None => Rgb([r, g, b]),
        }
    });
    img.save(path)?;
    Ok(())
}

/// Terrain base with a yellow-to-red development heat overlay
pub fn export_development_map(
    engine: &WorldEngine,
    civ: &CivilizationSim,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let img = render_cells(engine, |x, y| {
        let (r, g, b) = engine.terrain(x as i32, y as i32).color();
        let d = civ.development_at(x as i32, y as i32);
        if d > 0.01 {
            let heat = (255, (255.0 * (1.0 - d)) as u8, 0);
            Rgb([blend(r, heat.0), blend(g, heat.1), blend(b, heat.2)])
        } else {
            Rgb([r, g, b])
        }
    });
    img.save(path)?;
    Ok(())
}

fn render_cells(engine: &WorldEngine, color: impl Fn(usize, usize) -> Rgb<u8>) -> RgbImage {
    let mut img = RgbImage::new(engine.width() as u32, engine.height() as u32);
    for y in 0..engine.height() {
        for x in 0..engine.width() {
            img.put_pixel(x as u32, y as u32, color(x, y));
        }
    }
    img
}

/// 40% overlay tint on a base channel
fn blend(base: u8, overlay: u8) -> u8 {
    (base as f32 * 0.6 + overlay as f32 * 0.4) as u8
}

/// Marker size scales with settlement size
fn draw_city_marker(img: &mut RgbImage, city: &City) {
    let radius: i32 = if city.population > 5_000 {
        3
    } else if city.population > 1_000 {
        2
    } else {
        1
    };

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let x = city.x as i32 + dx;
            let y = city.y as i32 + dy;
            if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                img.put_pixel(x as u32, y as u32, CITY_COLOR);
            }
        }
    }
}

// =============================================================================
// JSON SUMMARY
// =============================================================================

#[derive(Serialize)]
struct RoadSummary {
    city_a: usize,
    city_b: usize,
    length: usize,
}

#[derive(Serialize)]
struct WorldSummary<'a> {
    master_seed: u64,
    width: usize,
    height: usize,
    island_mode: String,
    year: u32,
    total_population: u64,
    cities: &'a [City],
    roads: Vec<RoadSummary>,
}

/// Write a JSON snapshot of the world's entities and aggregates.
pub fn export_summary(engine: &WorldEngine, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let summary = WorldSummary {
        master_seed: engine.seeds().master,
        width: engine.width(),
        height: engine.height(),
        island_mode: engine.island_mode().to_string(),
        year: engine.year(),
        total_population: engine.total_population(),
        cities: engine.cities(),
        roads: engine
            .roads()
            .iter()
            .map(|r| RoadSummary {
                city_a: r.city_a,
                city_b: r.city_b,
                length: r.path.len(),
            })
            .collect(),
    };

    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::IslandMode;

    #[test]
    fn test_summary_serializes() {
        let mut engine = WorldEngine::new(50, 50);
        engine.generate_terrain(42, IslandMode::Single);
        engine.generate_climate();
        engine.initialize_civilization();

        let summary = WorldSummary {
            master_seed: engine.seeds().master,
            width: engine.width(),
            height: engine.height(),
            island_mode: engine.island_mode().to_string(),
            year: engine.year(),
            total_population: engine.total_population(),
            cities: engine.cities(),
            roads: Vec::new(),
        };

        let json = serde_json::to_string(&summary).expect("summary serializes");
        assert!(json.contains("\"master_seed\":42"));
        assert!(json.contains("Capital"));
    }
}
