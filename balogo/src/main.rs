#![allow(clippy::uninlined_format_args)]

mod edit;

use anyhow::{anyhow, bail, Context};
use balogo_rs::balogo_canvas2d::FontConfig;
use balogo_rs::{
    CommandClipboard, CropPolicy, DrawParams, FontLoader, LayoutConfig, LogoAssets, LogoRenderer,
    LogoSession, Offset,
};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// balogo: Render ba-style logos to PNG
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file overriding layout constants (camelCase keys)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Additional directory to search for fonts (repeatable)
    #[arg(long = "font-dir", global = true)]
    font_dirs: Vec<String>,

    /// Individual font file to load (repeatable)
    #[arg(long = "font-file", global = true)]
    font_files: Vec<String>,

    /// Do not scan the system font directories
    #[arg(long, global = true)]
    no_system_fonts: bool,

    /// Halo image drawn behind the right word
    #[arg(long, global = true, default_value = "assets/halo.png")]
    halo: String,

    /// Cross image drawn on top of the logo
    #[arg(long, global = true, default_value = "assets/cross.png")]
    cross: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render a logo to a PNG file
    Render {
        #[command(flatten)]
        logo: LogoArgs,

        /// Output file, or directory to write the default file name into
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        crop: CropArgs,
    },

    /// Render a logo and copy the PNG to the clipboard
    Copy {
        #[command(flatten)]
        logo: LogoArgs,

        #[command(flatten)]
        crop: CropArgs,
    },

    /// Edit a logo interactively with line commands read from stdin
    Edit {
        #[command(flatten)]
        logo: LogoArgs,

        /// PNG file rewritten after every successful redraw
        #[arg(long)]
        preview: Option<String>,

        #[command(flatten)]
        crop: CropArgs,
    },
}

#[derive(Debug, Args)]
struct LogoArgs {
    /// Blue word left of the halo
    #[arg(short, long)]
    left: Option<String>,

    /// Dark word right of the halo
    #[arg(short, long)]
    right: Option<String>,

    /// Caption under the right word
    #[arg(long)]
    second: Option<String>,

    /// CSS font family list for the caption
    #[arg(long)]
    second_fonts: Option<String>,

    /// Horizontal offset of the emblem
    #[arg(long, allow_hyphen_values = true)]
    graph_x: Option<i32>,

    /// Vertical offset of the emblem
    #[arg(long, allow_hyphen_values = true)]
    graph_y: Option<i32>,

    /// Caption distance from the right edge
    #[arg(long, allow_hyphen_values = true)]
    text2_x: Option<i32>,

    /// Caption distance below the baseline
    #[arg(long, allow_hyphen_values = true)]
    text2_y: Option<i32>,

    /// Leave the background transparent
    #[arg(long)]
    transparent: bool,

    /// Draw the caption
    #[arg(long)]
    second_line: bool,

    /// Clip the caption to below the baseline
    #[arg(long)]
    second_line_clip: bool,

    /// Draw layout guides
    #[arg(long)]
    debug: bool,

    /// Add a glow around the emblem
    #[arg(long)]
    glow: bool,
}

#[derive(Debug, Args)]
struct CropArgs {
    /// Always trim unused padding around the text
    #[arg(long, conflicts_with = "full")]
    tight: bool,

    /// Never crop the exported image
    #[arg(long)]
    full: bool,
}

impl CropArgs {
    fn policy(&self) -> CropPolicy {
        if self.full {
            CropPolicy::Full
        } else if self.tight {
            CropPolicy::Tight
        } else {
            CropPolicy::ExpandedOnly
        }
    }
}

impl LogoArgs {
    fn draw_params(&self, config: &LayoutConfig) -> DrawParams {
        let mut params = DrawParams::from_config(config);
        if let Some(left) = &self.left {
            params.text_left = left.clone();
        }
        if let Some(right) = &self.right {
            params.text_right = right.clone();
        }
        if let Some(second) = &self.second {
            params.text_secondary = second.clone();
        }
        if let Some(fonts) = &self.second_fonts {
            params.secondary_families = fonts.clone();
        }
        params.graph_offset = Offset {
            x: self.graph_x.unwrap_or(params.graph_offset.x),
            y: self.graph_y.unwrap_or(params.graph_offset.y),
        };
        params.text2_offset = Offset {
            x: self.text2_x.unwrap_or(params.text2_offset.x),
            y: self.text2_y.unwrap_or(params.text2_offset.y),
        };

        let toggles = &mut params.toggles;
        toggles.transparent_background = self.transparent;
        toggles.second_line_enabled = self.second_line;
        toggles.second_line_clip = self.second_line_clip;
        toggles.debug_enabled = self.debug;
        toggles.glow_enabled = self.glow;
        params
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => {
            let path = normalize_path(path)?;
            LayoutConfig::from_json_file(Path::new(&path))
                .with_context(|| format!("Failed to read config {}", path))?
        }
        None => LayoutConfig::default(),
    };

    let halo = normalize_path(&cli.halo)?;
    let cross = normalize_path(&cli.cross)?;
    let assets = LogoAssets::load(Path::new(&halo), Path::new(&cross))?;

    let font_config = FontConfig {
        font_dirs: normalize_paths(&cli.font_dirs)?,
        font_files: normalize_paths(&cli.font_files)?,
        load_system_fonts: !cli.no_system_fonts,
        ..FontConfig::default()
    };
    let fonts = FontLoader::load(font_config).await?;
    let mut renderer = LogoRenderer::new(config, fonts, assets)?;

    match cli.command {
        Commands::Render { logo, output, crop } => {
            let params = logo.draw_params(renderer.config());
            renderer.render(&params)?;
            let image = renderer.export(crop.policy())?;

            let signature = renderer.config().signature.clone();
            let path = output_path(output.as_deref(), &params, &signature)?;
            image
                .write_to(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}x{} logo to {}", image.width, image.height, path.display());
        }
        Commands::Copy { logo, crop } => {
            let params = logo.draw_params(renderer.config());
            let signature = renderer.config().signature.clone();
            let mut session =
                LogoSession::new(renderer, params, signature).with_crop_policy(crop.policy());
            if !session.redraw() {
                bail!(session.error_banner().unwrap_or("redraw failed").to_string());
            }
            let mut clipboard = CommandClipboard::detect()?;
            session.copy(&mut clipboard, Instant::now())?;
            println!("Copied {}", session.file_name());
        }
        Commands::Edit {
            logo,
            preview,
            crop,
        } => {
            let params = logo.draw_params(renderer.config());
            let signature = renderer.config().signature.clone();
            let preview = preview
                .as_deref()
                .map(normalize_path)
                .transpose()?
                .map(PathBuf::from);
            let session =
                LogoSession::new(renderer, params, signature).with_crop_policy(crop.policy());
            edit::run(session, preview).await?;
        }
    }
    Ok(())
}

/// Resolve `--output`: a directory (existing, or written with a trailing
/// separator) receives the default file name.
fn output_path(
    output: Option<&str>,
    params: &DrawParams,
    signature: &str,
) -> anyhow::Result<PathBuf> {
    let name = balogo_rs::file_name(params, signature);
    let Some(output) = output else {
        return Ok(PathBuf::from(name));
    };
    let output = normalize_path(output)?;
    let path = PathBuf::from(&output);
    if path.is_dir() || output.ends_with(std::path::MAIN_SEPARATOR) {
        Ok(path.join(name))
    } else {
        Ok(path)
    }
}

/// Expand `~` and environment variables in a path argument.
fn normalize_path(path: &str) -> anyhow::Result<String> {
    shellexpand::full(path.trim())
        .map(|p| p.into_owned())
        .map_err(|err| anyhow!("Invalid path {}: {}", path, err))
}

fn normalize_paths(paths: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    paths
        .iter()
        .map(|p| normalize_path(p).map(PathBuf::from))
        .collect()
}
