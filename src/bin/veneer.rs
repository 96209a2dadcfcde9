use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use veneer::{
    FsImageLoader, ImageLoader as _, PreviewOutput, PreviewRequest, VisualizerSession,
    build_texture, builtin_mockups, classify, normalize_source, select_recipe, source_id,
};

#[derive(Parser, Debug)]
#[command(name = "veneer", version)]
struct Cli {
    /// Root directory that image references resolve against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a product photo and print the selected recipe as JSON.
    Classify(ClassifyArgs),
    /// Synthesize the bookmatched texture for a product photo.
    Tile(TileArgs),
    /// Paint a product photo into a room mockup.
    Preview(PreviewArgs),
    /// List the builtin mockups and their regions as JSON.
    Mockups,
}

#[derive(Parser, Debug)]
struct ClassifyArgs {
    /// Product photo, relative to --root.
    image: String,
}

#[derive(Parser, Debug)]
struct TileArgs {
    /// Product photo, relative to --root.
    image: String,

    /// Output path.
    #[arg(long, short = 'o')]
    out: PathBuf,

    /// Write the baked JPEG payload instead of a PNG.
    #[arg(long)]
    jpeg: bool,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Product photo, relative to --root.
    image: String,

    /// Mockup id (see `veneer mockups`).
    #[arg(long)]
    mockup: String,

    /// Region to paint; repeat for several. Default paints every region.
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Output PNG path (flattened preview).
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,

    /// Print the layered description as JSON instead of flattening.
    #[arg(long)]
    layered: bool,

    /// Product name for the report. Defaults to the image reference.
    #[arg(long)]
    name: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Classify(args) => cmd_classify(&cli.root, args),
        Command::Tile(args) => cmd_tile(&cli.root, args),
        Command::Preview(args) => cmd_preview(&cli.root, args),
        Command::Mockups => cmd_mockups(),
    }
}

fn cmd_classify(root: &Path, args: ClassifyArgs) -> anyhow::Result<()> {
    let mut loader = FsImageLoader::new(root);
    let prepared = loader.load(&args.image)?;
    let classification = classify(prepared.dims.width, prepared.dims.height)?;
    let recipe = select_recipe(classification);

    let report = serde_json::json!({
        "width": prepared.dims.width,
        "height": prepared.dims.height,
        "classification": classification,
        "recipe": recipe,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_tile(root: &Path, args: TileArgs) -> anyhow::Result<()> {
    let mut loader = FsImageLoader::new(root);
    let prepared = loader.load(&args.image)?;
    let id = source_id(&normalize_source(&args.image)?);
    let classification = classify(prepared.dims.width, prepared.dims.height)?;
    let texture = build_texture(&prepared, id, select_recipe(classification))?;

    ensure_parent_dir(&args.out)?;
    if args.jpeg {
        std::fs::write(&args.out, texture.jpeg.as_slice())
            .with_context(|| format!("write jpeg '{}'", args.out.display()))?;
    } else {
        image::save_buffer_with_format(
            &args.out,
            texture.pixels.as_raw(),
            texture.dims.width,
            texture.dims.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_preview(root: &Path, args: PreviewArgs) -> anyhow::Result<()> {
    let mut session = VisualizerSession::new(FsImageLoader::new(root));
    let request = PreviewRequest {
        source: args.image.clone(),
        product_name: args.name.unwrap_or_else(|| args.image.clone()),
        mockup_id: args.mockup,
        regions: args.regions,
        flatten: !args.layered,
    };

    let (output, report) = session.preview(&request)?;
    match output {
        PreviewOutput::Bitmap(bitmap) => {
            let out = args
                .out
                .context("--out is required when flattening (or pass --layered)")?;
            ensure_parent_dir(&out)?;
            image::save_buffer_with_format(
                &out,
                bitmap.pixels.as_raw(),
                bitmap.dims.width,
                bitmap.dims.height,
                image::ColorType::Rgba8,
                image::ImageFormat::Png,
            )
            .with_context(|| format!("write png '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        PreviewOutput::Layered(layered) => {
            println!("{}", serde_json::to_string_pretty(&layered)?);
        }
    }

    if !report.fallbacks.is_empty() {
        eprintln!("fallbacks: {}", serde_json::to_string(&report.fallbacks)?);
    }
    Ok(())
}

fn cmd_mockups() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&builtin_mockups())?);
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
