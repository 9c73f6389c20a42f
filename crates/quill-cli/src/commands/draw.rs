//! Draw command: replay a recorded stroke file through the draw curve tool

use super::load_config;
use anyhow::{Context, Result};
use quill_core::Vec3;
use quill_scene::{load_scene, History, PostRenderHub, Scene};
use quill_tool::{register_draw_curve, PointerEvent, ToolRegistry, CONTEXT_CLASS};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub struct DrawArgs {
    pub scene: String,
    pub stroke: String,
    pub length: Option<f64>,
    pub config: String,
    pub undo: usize,
    pub format: String,
}

/// Recorded input, in the order it happened
#[derive(Debug, Deserialize)]
pub struct StrokeFile {
    #[serde(default)]
    pub events: Vec<StrokeEvent>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrokeEvent {
    Press { x: f64, y: f64 },
    Drag { x: f64, y: f64 },
    Release { x: f64, y: f64 },
    /// Orbit the camera around its target and re-render
    Orbit { degrees: f64 },
    /// Change the edit point spacing
    SetLength { length: f64 },
}

impl StrokeFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stroke file {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse stroke file")
    }
}

#[derive(Debug, Serialize)]
struct DrawReport {
    scene: String,
    curves: Vec<CurveReport>,
    journal: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CurveReport {
    name: String,
    degree: usize,
    spans: usize,
    length: f64,
    edit_points: Vec<[f64; 3]>,
    control_points: Vec<[f64; 3]>,
    knots: Vec<f64>,
}

pub fn run(args: DrawArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    if let Some(length) = args.length {
        config.length = length;
    }

    let (mut scene, mut view, scene_file) =
        load_scene(&args.scene).context("Failed to load scene")?;
    let stroke = StrokeFile::load(Path::new(&args.stroke))?;

    let mut registry = ToolRegistry::new();
    register_draw_curve(&mut registry, config).context("Invalid tool config")?;
    let (instance, mut ctx) = registry.create_context(CONTEXT_CLASS)?;
    log::info!("replaying {} events with {instance}", stroke.events.len());

    let mut hub = PostRenderHub::new();
    let mut history = History::new();
    ctx.on_activate(&view, &scene, &mut hub)?;

    for (i, event) in stroke.events.iter().enumerate() {
        let pointer = match *event {
            StrokeEvent::Press { x, y } => PointerEvent::Press { x, y },
            StrokeEvent::Drag { x, y } => PointerEvent::Drag { x, y },
            StrokeEvent::Release { x, y } => PointerEvent::Release { x, y },
            StrokeEvent::Orbit { degrees } => {
                view.camera.orbit_horizontal(degrees.to_radians());
                hub.notify(&view);
                continue;
            }
            StrokeEvent::SetLength { length } => {
                ctx.set_length(length)
                    .with_context(|| format!("Event {i}: invalid length"))?;
                continue;
            }
        };
        ctx.handle_event(pointer, &view, &mut scene, &mut history)
            .with_context(|| format!("Event {i} ({pointer:?}) failed"))?;
    }
    ctx.on_deactivate(&mut hub, &mut scene)?;

    for _ in 0..args.undo {
        if !history.undo(&mut scene)? {
            break;
        }
    }

    let report = DrawReport {
        scene: scene_file.scene.name.clone(),
        curves: curve_reports(&scene),
        journal: history.iter().map(|cmd| cmd.journal()).collect(),
    };
    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(&report)?,
        "toml" => toml::to_string_pretty(&report)?,
        _ => anyhow::bail!("Unknown format: {}", args.format),
    };
    println!("{}", output);

    Ok(())
}

fn curve_reports(scene: &Scene) -> Vec<CurveReport> {
    let to_arrays =
        |points: &[Vec3]| -> Vec<[f64; 3]> { points.iter().map(Vec3::to_array).collect() };
    scene
        .curves()
        .map(|(id, curve)| CurveReport {
            name: scene.name_of(id).unwrap_or_default().to_string(),
            degree: curve.degree,
            spans: curve.num_spans(),
            length: curve.approximate_length(16),
            edit_points: to_arrays(&curve.edit_points),
            control_points: to_arrays(&curve.control_points),
            knots: curve.knots.clone(),
        })
        .collect()
}
