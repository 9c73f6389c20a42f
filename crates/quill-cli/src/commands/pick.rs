//! Pick command

use super::load_config;
use anyhow::{Context, Result};
use quill_scene::{load_scene, SelectionSource};
use quill_tool::intersect;

pub fn run(scene_path: &str, x: f64, y: f64, config_path: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let (scene, view, _) = load_scene(scene_path).context("Failed to load scene")?;

    let candidates = scene.selected_surfaces();
    if candidates.is_empty() {
        log::warn!("no surfaces selected in {scene_path}");
    }

    let hit = intersect(
        &view,
        x,
        y,
        &candidates,
        &scene,
        config.max_ray_length,
        config.hit_tolerance,
    )
    .context("Failed to pick")?;

    match hit {
        Some(hit) => {
            let name = scene.name_of(hit.surface).unwrap_or("?");
            println!(
                "{} at ({}, {}, {}), distance {:.4}",
                name, hit.point.x, hit.point.y, hit.point.z, hit.distance
            );
        }
        None => println!("no surface under ({x}, {y})"),
    }
    Ok(())
}
