use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use video_engracado::{
    Canvas, CapabilityQuery, FfmpegCapabilities, FfmpegEncoder, FfmpegEncoderOpts, FontSet,
    FrameClock, GeneratorConfig, RealtimeClock, RunOptions, StaticCapabilities, Studio, Theme,
    VirtualClock, negotiate_mime_type,
};

#[derive(Parser, Debug)]
#[command(name = "video-engracado", version)]
struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a clip and save it as `video-engracado.webm` (requires `ffmpeg` on PATH).
    Generate(GenerateArgs),
    /// Render a single still as a PNG.
    Frame(FrameArgs),
    /// Print the recording type this host supports.
    Probe,
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// JSON config file; flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Visual theme: Colorido, Pastel or Escuro.
    #[arg(long)]
    theme: Option<Theme>,

    /// Font for captions (defaults to a common system font).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font for the face glyphs (defaults to the caption font).
    #[arg(long)]
    emoji_font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Clip length in seconds (3 to 20).
    #[arg(long)]
    duration: Option<f64>,

    /// Frames per second (24 to 60).
    #[arg(long)]
    fps: Option<u32>,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Pace the animation against the wall clock instead of rendering as fast as possible.
    #[arg(long, default_value_t = false)]
    realtime: bool,

    /// Skip the `ffmpeg -encoders` query and assume every WebM variant is available.
    #[arg(long, default_value_t = false)]
    assume_supported: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Time of the still, in seconds.
    #[arg(long, default_value_t = 0.0)]
    t: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Probe => cmd_probe(),
    };
    if let Err(e) = result {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(scene: &SceneArgs) -> anyhow::Result<GeneratorConfig> {
    let mut config = match &scene.config {
        Some(path) => GeneratorConfig::from_path(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(theme) = scene.theme {
        config.theme = theme;
    }
    Ok(config)
}

fn load_fonts(scene: &SceneArgs) -> anyhow::Result<FontSet> {
    FontSet::discover(scene.font.as_deref(), scene.emoji_font.as_deref())
        .context("load fonts")
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.scene)?;
    if let Some(duration) = args.duration {
        config.duration_secs = duration;
    }
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    let config = config.clamped();

    let caps: Box<dyn CapabilityQuery> = if args.assume_supported {
        Box::new(StaticCapabilities::new(video_engracado::probe::FALLBACK_MIMES))
    } else {
        Box::new(FfmpegCapabilities::detect())
    };
    let options = RunOptions {
        canvas: Canvas::HD,
        fonts: load_fonts(&args.scene)?,
    };

    let mut clock: Box<dyn FrameClock> = if args.realtime {
        Box::new(RealtimeClock::new(RealtimeClock::DEFAULT_REFRESH_HZ))
    } else {
        Box::new(VirtualClock::with_rate(RealtimeClock::DEFAULT_REFRESH_HZ))
    };

    eprintln!("Gerando...");
    let mut studio = Studio::new(caps, options);
    studio.generate(&config, clock.as_mut(), |_mime| {
        Ok(FfmpegEncoder::new(FfmpegEncoderOpts::default()))
    })?;

    if let Some(message) = studio.error_text() {
        anyhow::bail!(message);
    }
    let path = studio.save_download(&args.out)?;
    if let Some(published) = studio.published() {
        let report = &published.report;
        eprintln!(
            "{} frames, {:.2}s, {} bytes ({})",
            report.frames,
            report.video_secs(config.fps),
            report.bytes,
            report.mime_type
        );
    }
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = load_config(&args.scene)?.clamped();
    let fonts = load_fonts(&args.scene)?;
    let frame = video_engracado::render_still(&config, Canvas::HD, fonts, args.t)?
        .into_straight_alpha();

    if let Some(parent) = args.out.parent() {
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

fn cmd_probe() -> anyhow::Result<()> {
    let caps = FfmpegCapabilities::detect();
    match negotiate_mime_type(&caps, video_engracado::probe::PREFERRED_MIME) {
        Some(mime) => {
            println!("{mime}");
            Ok(())
        }
        None => anyhow::bail!(video_engracado::GenError::UnsupportedFormat.user_message()),
    }
}
