use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "actfx", version)]
struct Cli {
    /// Log pipeline progress at DEBUG level.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print effect parameter schemas as JSON.
    Schema(SchemaArgs),
    /// Apply (or preview) one effect to an Act document.
    Apply(ApplyArgs),
}

#[derive(Parser, Debug)]
struct SchemaArgs {
    /// Only print this effect's schema.
    #[arg(long)]
    effect: Option<String>,
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input Act document (JSON).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Effect configuration (JSON).
    #[arg(long)]
    config: PathBuf,

    /// Output Act document (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Run on a copy without opening a transaction.
    #[arg(long)]
    preview: bool,

    /// Also write every atlas image as PNG into this directory.
    #[arg(long)]
    atlas_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Schema(args) => cmd_schema(args),
        Command::Apply(args) => cmd_apply(args),
    }
}

fn cmd_schema(args: SchemaArgs) -> anyhow::Result<()> {
    let registry = actfx::EffectRegistry::default();
    let json = match args.effect {
        Some(name) => serde_json::to_string_pretty(&registry.schema(&name)?)?,
        None => serde_json::to_string_pretty(&registry.schemas())?,
    };
    println!("{json}");
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let mut act: actfx::Act = read_json(&args.in_path, "act")?;
    act.validate()?;
    let config: actfx::EffectConfig = read_json(&args.config, "effect config")?;

    let registry = actfx::EffectRegistry::default();
    if args.preview {
        act = registry.preview(&act, &config)?;
    } else {
        let mut backup = actfx::SnapshotBackup::new();
        let stats = registry.apply(&mut act, &mut backup, &config)?;
        tracing::info!(
            effect = %config.effect,
            actions = stats.actions,
            inserted = stats.images_inserted,
            removed = stats.cleanup.removed_images,
            "effect applied"
        );
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, act.to_json()?)
        .with_context(|| format!("write act '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());

    if let Some(dir) = &args.atlas_dir {
        dump_atlas(&act, dir)?;
    }
    Ok(())
}

fn dump_atlas(act: &actfx::Act, dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create atlas dir '{}'", dir.display()))?;
    for (sprite, image) in act.atlas().iter() {
        if image.is_empty() {
            continue;
        }
        let rgba = image.to_rgba(&act.palette);
        let actfx::Pixels::Rgba(colors) = &rgba.pixels else {
            anyhow::bail!("atlas image {sprite} did not resolve to direct color (bug)");
        };
        let data: Vec<u8> = colors.iter().flat_map(|c| [c.r, c.g, c.b, c.a]).collect();
        let path = dir.join(format!(
            "{:04}_{}.png",
            act.atlas().absolute_index(sprite),
            sprite.to_string().replace('#', "_")
        ));
        image::save_buffer_with_format(
            &path,
            &data,
            image.width,
            image.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
    }
    eprintln!("wrote atlas to {}", dir.display());
    Ok(())
}
