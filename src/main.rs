//! Lombax CLI - Command-line tool for engine container decoding and export.
//!
//! This is the main entry point for the Lombax command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use lombax::export::write_texture_image;
use lombax::prelude::*;

/// Lombax - engine container decoding and export tool
#[derive(Parser)]
#[command(name = "lombax")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header and section counts of an engine file
    Info {
        /// Path to the engine file
        #[arg(short, long, env = "LOMBAX_ENGINE")]
        engine: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a level to Wavefront OBJ
    ExportLevel {
        /// Path to the engine file
        #[arg(short, long, env = "LOMBAX_ENGINE")]
        engine: PathBuf,

        /// Output OBJ file
        #[arg(short, long, env = "LOMBAX_OUTPUT")]
        output: PathBuf,

        /// Composition mode (combined, separate, typewise, materialwise)
        #[arg(short, long, default_value = "combined")]
        mode: CompositionMode,

        /// Terrain chunks to export (all when omitted)
        #[arg(long, value_delimiter = ',')]
        chunks: Option<Vec<usize>>,

        /// Skip ties
        #[arg(long)]
        no_ties: bool,

        /// Skip shrubs
        #[arg(long)]
        no_shrubs: bool,

        /// Skip mobies
        #[arg(long)]
        no_mobies: bool,

        /// Don't write a material file
        #[arg(long)]
        no_mtl: bool,
    },

    /// Export one model to OBJ or IQE
    ExportModel {
        /// Path to the engine file
        #[arg(short, long, env = "LOMBAX_ENGINE")]
        engine: PathBuf,

        /// Companion VRAM file, for texture images
        #[arg(short, long, env = "LOMBAX_VRAM")]
        vram: Option<PathBuf>,

        /// Model category
        #[arg(short, long, value_enum, default_value = "moby")]
        category: ModelCategory,

        /// Model id (decimal or 0x-prefixed hex)
        #[arg(short, long, value_parser = parse_id)]
        id: u32,

        /// Output file; `.iqe` selects Inter-Quake Export
        #[arg(short, long, env = "LOMBAX_OUTPUT")]
        output: PathBuf,
    },

    /// Export every texture as PNG
    ExportTextures {
        /// Path to the engine file
        #[arg(short, long, env = "LOMBAX_ENGINE")]
        engine: PathBuf,

        /// Companion VRAM file
        #[arg(short, long, env = "LOMBAX_VRAM")]
        vram: PathBuf,

        /// Output directory
        #[arg(short, long, env = "LOMBAX_OUTPUT")]
        output: PathBuf,
    },

    /// Write the raw bytes of a blob section
    DumpSection {
        /// Path to the engine file
        #[arg(short, long, env = "LOMBAX_ENGINE")]
        engine: PathBuf,

        /// Section name (render-defaults, collision, billboards, sound-config)
        #[arg(short, long)]
        section: String,

        /// Output file
        #[arg(short, long, env = "LOMBAX_OUTPUT")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelCategory {
    Tie,
    Shrub,
    Moby,
    Gadget,
    Skybox,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { engine, json } => {
            cmd_info(&engine, json)?;
        }
        Commands::ExportLevel {
            engine,
            output,
            mode,
            chunks,
            no_ties,
            no_shrubs,
            no_mobies,
            no_mtl,
        } => {
            let mut settings = LevelExportSettings {
                mode,
                write_ties: !no_ties,
                write_shrubs: !no_shrubs,
                write_mobies: !no_mobies,
                export_material_file: !no_mtl,
                ..Default::default()
            };
            if let Some(chunks) = chunks {
                settings.chunks_selected = [false; 5];
                for chunk in chunks {
                    let slot = settings
                        .chunks_selected
                        .get_mut(chunk)
                        .with_context(|| format!("Terrain chunk {} out of range", chunk))?;
                    *slot = true;
                }
            }
            cmd_export_level(&engine, &output, &settings)?;
        }
        Commands::ExportModel {
            engine,
            vram,
            category,
            id,
            output,
        } => {
            cmd_export_model(&engine, vram.as_deref(), category, id, &output)?;
        }
        Commands::ExportTextures { engine, vram, output } => {
            cmd_export_textures(&engine, &vram, &output)?;
        }
        Commands::DumpSection { engine, section, output } => {
            cmd_dump_section(&engine, &section, &output)?;
        }
    }

    Ok(())
}

fn open_engine(path: &Path) -> Result<EngineFile> {
    EngineFile::open(path).with_context(|| format!("Failed to open engine file {}", path.display()))
}

fn load_level(path: &Path) -> Result<Level> {
    let start = Instant::now();
    let file = open_engine(path)?;
    let level = Level::load(&file).context("Failed to decode level")?;

    println!(
        "Loaded {} level in {:?}: {} ties, {} shrubs, {} mobies, {} textures",
        file.game(),
        start.elapsed(),
        level.ties.len(),
        level.shrubs.len(),
        level.mobies.len(),
        level.textures.len()
    );

    Ok(level)
}

fn cmd_info(engine: &Path, json: bool) -> Result<()> {
    let file = open_engine(engine)?;
    let table = file.pointer_table();
    let level = Level::load(&file).context("Failed to decode level")?;

    if json {
        let sections: Vec<_> = table
            .iter()
            .map(|(section, entry)| {
                serde_json::json!({
                    "section": section,
                    "pointer": entry.pointer,
                    "count": entry.count,
                    "absent": table.is_absent(section),
                })
            })
            .collect();
        let info = serde_json::json!({
            "game": file.game(),
            "size": file.data().len(),
            "sections": sections,
            "tie_models": level.tie_models.len(),
            "shrub_models": level.shrub_models.len(),
            "moby_models": level.moby_models.len(),
            "gadget_models": level.gadget_models.len(),
            "ties": level.ties.len(),
            "shrubs": level.shrubs.len(),
            "mobies": level.mobies.len(),
            "textures": level.textures.len(),
            "lights": level.lights.len(),
            "player_animations": level.player_animations.len(),
            "ui_elements": level.ui_elements.len(),
            "light_config": level.light_config,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Game: {}", file.game());
    println!("Size: {} bytes", file.data().len());
    println!();
    println!("{:<20} {:>10} {:>8}", "Section", "Pointer", "Count");
    for (section, entry) in table.iter() {
        if table.is_absent(section) {
            println!("{:<20} {:>10} {:>8}", section.name(), "-", "-");
        } else {
            println!("{:<20} {:>#10x} {:>8}", section.name(), entry.pointer, entry.count);
        }
    }
    println!();
    println!(
        "Models: {} ties, {} shrubs, {} mobies, {} gadgets",
        level.tie_models.len(),
        level.shrub_models.len(),
        level.moby_models.len(),
        level.gadget_models.len()
    );
    println!(
        "Instances: {} ties, {} shrubs, {} mobies",
        level.ties.len(),
        level.shrubs.len(),
        level.mobies.len()
    );
    let fragments: usize = level.terrain.iter().map(|c| c.fragments.len()).sum();
    println!("Terrain: {} chunks, {} fragments", level.terrain.len(), fragments);
    println!(
        "Textures: {}, lights: {}, player animations: {}",
        level.textures.len(),
        level.lights.len(),
        level.player_animations.len()
    );

    Ok(())
}

fn cmd_export_level(engine: &Path, output: &Path, settings: &LevelExportSettings) -> Result<()> {
    if !settings.mode.is_supported() {
        anyhow::bail!("Composition mode {} is not supported", settings.mode);
    }

    let level = load_level(engine)?;

    println!("Exporting level ({}): {}", settings.mode, output.display());
    let start = Instant::now();
    let summary = write_level_obj(&level, output, settings).context("Failed to export level")?;

    println!(
        "Wrote {} objects, {} vertices, {} faces, {} materials in {:?}",
        summary.objects,
        summary.vertices,
        summary.faces,
        summary.materials,
        start.elapsed()
    );

    Ok(())
}

fn cmd_export_model(
    engine: &Path,
    vram: Option<&Path>,
    category: ModelCategory,
    id: u32,
    output: &Path,
) -> Result<()> {
    let level = load_level(engine)?;

    let placed = match category {
        ModelCategory::Tie => Some(Category::Tie),
        ModelCategory::Shrub => Some(Category::Shrub),
        ModelCategory::Moby => Some(Category::Moby),
        ModelCategory::Gadget | ModelCategory::Skybox => None,
    };
    let mesh = match (category, placed) {
        (_, Some(placed)) => level.model(placed, id),
        (ModelCategory::Gadget, None) => level.gadget_models.iter().find(|m| m.id == id),
        _ => level.skybox.as_ref(),
    }
    .with_context(|| format!("No model with id {:#x}", id))?;
    let clips = match placed {
        Some(placed) => level.clips_for(placed, mesh),
        None => mesh.animations.as_slice(),
    };

    let vram_data = vram
        .map(|path| fs::read(path).with_context(|| format!("Failed to read VRAM file {}", path.display())))
        .transpose()?;
    let images = vram_data.as_deref().map(RawVramImages::new);
    let side_channel = images.as_ref().map(|images| TextureSideChannel {
        images,
        textures: &level.textures,
    });

    println!("Exporting model {:#x}: {}", mesh.id, output.display());

    let is_iqe = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("iqe"));
    if is_iqe {
        if !mesh.has_skeleton() {
            println!("Model has no skeleton; writing geometry only");
        }
        write_mesh_iqe(mesh, clips, output, side_channel.as_ref())
            .context("Failed to write IQE")?;
    } else {
        write_mesh_obj(mesh, output, side_channel.as_ref()).context("Failed to write OBJ")?;
    }

    println!("Output written");

    Ok(())
}

fn cmd_export_textures(engine: &Path, vram: &Path, output: &Path) -> Result<()> {
    let file = open_engine(engine)?;
    let textures = file.textures().context("Failed to decode textures")?;
    let vram_data = fs::read(vram).with_context(|| format!("Failed to read VRAM file {}", vram.display()))?;
    let images = RawVramImages::new(&vram_data);

    println!("Exporting {} textures to {}...", textures.len(), output.display());

    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(textures.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let errors = AtomicUsize::new(0);

    textures.par_iter().for_each(|texture| {
        if let Err(e) = write_texture_image(&images, texture, output) {
            tracing::warn!(texture = texture.id, error = %e, "failed to export texture");
            errors.fetch_add(1, Ordering::Relaxed);
        }
        pb.inc(1);
    });

    pb.finish_with_message("Done");
    let errors = errors.into_inner();
    println!(
        "Exported {} textures in {:?} ({} errors)",
        textures.len() - errors,
        start.elapsed(),
        errors
    );

    Ok(())
}

fn cmd_dump_section(engine: &Path, name: &str, output: &Path) -> Result<()> {
    let section = Section::from_name(name).with_context(|| format!("Unknown section: {}", name))?;
    if section.length_strategy().is_none() {
        anyhow::bail!("Section {} has no raw byte span to dump", section);
    }

    let file = open_engine(engine)?;
    let bytes = file
        .section_bytes(section)
        .with_context(|| format!("Failed to resolve section {}", section))?;

    fs::write(output, bytes).context("Failed to write output file")?;
    println!("Wrote {} bytes of {} to {}", bytes.len(), section, output.display());

    Ok(())
}

/// Parse a model id, decimal or `0x`-prefixed hex.
fn parse_id(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid model id {s:?}: {e}"))
}
