//! Quill CLI - replay drawing strokes against a scene without a viewer

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{draw, pick};

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Draw curves on scene surfaces from recorded pointer strokes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a stroke file and report the committed curves
    Draw {
        /// Path to scene file
        scene: String,

        /// Path to stroke file (TOML list of pointer events)
        stroke: String,

        /// Minimum spacing between edit points (overrides the config)
        #[arg(long)]
        length: Option<f64>,

        /// Path to tool config file
        #[arg(long, default_value = "quill.toml")]
        config: String,

        /// Number of strokes to undo after replaying
        #[arg(long, default_value = "0")]
        undo: usize,

        /// Output format (json or toml)
        #[arg(long, default_value = "json", value_parser = parse_format)]
        format: String,
    },

    /// Report the closest selected surface under a pixel
    Pick {
        /// Path to scene file
        scene: String,

        /// Pixel column
        #[arg(long)]
        x: f64,

        /// Pixel row (from the top)
        #[arg(long)]
        y: f64,

        /// Path to tool config file
        #[arg(long, default_value = "quill.toml")]
        config: String,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "json" | "toml" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: json, toml", s)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Draw {
            scene,
            stroke,
            length,
            config,
            undo,
            format,
        } => draw::run(draw::DrawArgs {
            scene,
            stroke,
            length,
            config,
            undo,
            format,
        }),
        Commands::Pick { scene, x, y, config } => pick::run(&scene, x, y, &config),
    }
}
