use std::{
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bongocat", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn an image into an animated Bongo Cat GIF.
    Render(RenderArgs),
    /// Render a single synthesized frame as a PNG.
    Frame(FrameArgs),
    /// Run the HTTP upload service.
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct ProcessingArgs {
    /// JSON processing config; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames per drumming cycle.
    #[arg(long)]
    frames: Option<u32>,

    /// Per-frame delay in milliseconds.
    #[arg(long)]
    delay_ms: Option<u32>,

    /// NeuQuant sample factor (1 = best, 30 = fastest).
    #[arg(long)]
    quality: Option<i32>,

    /// Loop count (0 = forever).
    #[arg(long)]
    repeat: Option<u16>,

    /// Synthesize frames in parallel.
    #[arg(long)]
    parallel: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image (PNG, JPEG, GIF, ...).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    processing: ProcessingArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    index: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    processing: ProcessingArgs,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Listen port.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Listen address.
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Static file root; GIFs are written to `<public-dir>/generated`.
    #[arg(long, default_value = "public")]
    public_dir: PathBuf,

    /// Maximum upload size in bytes.
    #[arg(long, default_value_t = bongocat::server::DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    #[command(flatten)]
    processing: ProcessingArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Serve(args) => cmd_serve(args),
    }
}

fn load_config(args: &ProcessingArgs) -> anyhow::Result<bongocat::BongoConfig> {
    let mut cfg = match &args.config {
        Some(path) => bongocat::BongoConfig::from_path(path)?,
        None => bongocat::BongoConfig::default(),
    };
    if let Some(frames) = args.frames {
        cfg.synth.frame_count = frames;
    }
    if let Some(delay_ms) = args.delay_ms {
        cfg.animation.delay_ms = delay_ms;
    }
    if let Some(quality) = args.quality {
        cfg.animation.quality = quality;
    }
    if let Some(repeat) = args.repeat {
        cfg.animation.repeat = repeat;
    }
    if args.parallel {
        cfg.synth.parallel = true;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.processing)?;
    let existed = args.out.try_exists().unwrap_or(true);

    match bongocat::process_file(&args.in_path, &args.out, &cfg) {
        Ok(report) => {
            eprintln!(
                "wrote {} ({}x{}, {} frames, {} bytes)",
                args.out.display(),
                report.width,
                report.height,
                report.frame_count,
                report.bytes_written
            );
            Ok(())
        }
        Err(e) => {
            // Never delete a file this run did not create.
            if existed {
                tracing::warn!(path = %args.out.display(), "left pre-existing output in place; it may be incomplete");
            } else {
                remove_partial(&args.out);
            }
            Err(e).with_context(|| format!("render '{}'", args.in_path.display()))
        }
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.processing)?;
    let image = bongocat::load_image(&args.in_path)?;
    let frame = bongocat::render_frame(&image, bongocat::FrameIndex(args.index), &cfg.synth)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let addr = SocketAddr::new(args.host, args.port);
    let mut cfg = bongocat::ServerConfig::new(addr, args.public_dir);
    cfg.max_upload_bytes = args.max_upload_bytes;
    cfg.processing = load_config(&args.processing)?;

    let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
    runtime.block_on(bongocat::server::serve(cfg))?;
    Ok(())
}

fn remove_partial(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::info!(path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output");
        }
    }
}
