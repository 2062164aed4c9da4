use crate::config::{Config, LayoutAlgorithm, load_config};
use crate::engine::Controller;
use crate::hierarchy::build_tree;
use crate::render::{render_document, write_output_html};
use crate::scene::Scene;
use crate::scene_dump::write_scene_dump;
use crate::theme::Theme;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mmg",
    version,
    about = "Turns loose text into a self-contained interactive mind map document"
)]
pub struct Args {
    /// Payload text file, or '-' for stdin
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output HTML file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Color theme preset
    #[arg(short = 't', long = "theme", value_enum)]
    pub theme: Option<ThemeChoice>,

    /// Initial view width in CSS pixels
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Initial view height in CSS pixels
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Layout algorithm
    #[arg(short = 'l', long = "layout", value_enum)]
    pub layout: Option<LayoutChoice>,

    /// Write the computed scene geometry as JSON to this file
    #[arg(long = "dump-scene", value_name = "FILE")]
    pub dump_scene: Option<PathBuf>,

    /// Measure labels against the bundled font instead of the fast width table
    #[arg(long = "precise-text")]
    pub precise_text: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ThemeChoice {
    Clean,
    Slate,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LayoutChoice {
    RadialSector,
    Circular,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = apply_overrides(load_config(args.config.as_deref())?, &args);

    let payload = read_input(args.input.as_deref())?;
    let tree = build_tree(&payload)?;
    let scene = Scene::build(&tree, &config);
    let controller = Controller::new(
        scene,
        config.viewport.clone(),
        config.render.width,
        config.render.height,
    );
    if let Some(path) = args.dump_scene.as_deref() {
        write_scene_dump(path, controller.scene())?;
    }
    let html = render_document(controller.scene(), &config)?;
    write_output_html(&html, args.output.as_deref())?;
    Ok(())
}

// The document itself goes to stdout, so diagnostics stay on stderr.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if let Some(theme) = args.theme {
        config.theme = match theme {
            ThemeChoice::Clean => Theme::clean(),
            ThemeChoice::Slate => Theme::slate(),
        };
    }
    if let Some(layout) = args.layout {
        config.layout.algorithm = match layout {
            LayoutChoice::RadialSector => LayoutAlgorithm::RadialSector,
            LayoutChoice::Circular => LayoutAlgorithm::Circular,
        };
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if args.precise_text {
        config.node.fast_text_metrics = false;
    }
    config
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
