use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ntsc", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the effect to a PNG as one frame of the selected backend.
    Apply(ApplyArgs),
    /// Print the default effect parameters as JSON.
    Params,
    /// Render the parameter showcase cycle over a PNG.
    Showcase(ShowcaseArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Effect parameters JSON; missing fields take their defaults.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Host backend to emulate.
    #[arg(long, value_enum, default_value_t = BackendChoice::Legacy)]
    backend: BackendChoice,

    /// Frame index (drives the slant-noise dither).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Destination scale relative to the input, for backends with a separate destination.
    #[arg(long, default_value_t = 1.0)]
    output_scale: f32,
}

#[derive(Parser, Debug)]
struct ShowcaseArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving one PNG per step.
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of cycle steps to render.
    #[arg(long, default_value_t = 18)]
    steps: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Legacy,
    Urp,
    UrpGraph,
    Hdrp,
}

impl BackendChoice {
    fn host(self) -> ntsc_crt::HostInfo {
        match self {
            Self::Legacy => ntsc_crt::HostInfo::legacy(),
            Self::Urp => ntsc_crt::HostInfo::universal(false),
            Self::UrpGraph => ntsc_crt::HostInfo::universal(true),
            Self::Hdrp => ntsc_crt::HostInfo::high_definition(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Params => cmd_params(),
        Command::Showcase(args) => cmd_showcase(args),
    }
}

fn read_png(path: &Path) -> anyhow::Result<ntsc_crt::FloatImage> {
    let img = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .to_rgba8();
    Ok(ntsc_crt::FloatImage::from_rgba_image(&img)?)
}

fn write_png(path: &Path, frame: &ntsc_crt::FloatImage) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }
    frame
        .to_rgba_image()?
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    if !args.output_scale.is_finite() || args.output_scale <= 0.0 {
        anyhow::bail!("--output-scale must be a positive number");
    }
    let params = match &args.params {
        Some(path) => ntsc_crt::EffectParams::from_path(path)
            .with_context(|| format!("load parameters '{}'", path.display()))?,
        None => ntsc_crt::EffectParams::default(),
    };

    let registry = Arc::new(ntsc_crt::ShaderRegistry::new());
    let library = ntsc_crt::CpuDevice::shader_library();
    let caps = ntsc_crt::HostCapabilities::detect(&args.backend.host())?;
    let mut backend = ntsc_crt::create_backend(&caps, &library, Arc::clone(&registry), params);
    let mut device = ntsc_crt::CpuDevice::new(registry);

    let frame = read_png(&args.in_path)?;
    let size = frame.size();
    let scaled = |side: u32| (f64::from(side) * f64::from(args.output_scale)).round() as i64;
    let destination = ntsc_crt::Extent::new(
        ntsc_crt::clamp_dimension(scaled(size.width)),
        ntsc_crt::clamp_dimension(scaled(size.height)),
    );
    let (outcome, out) = device.render_still(
        backend.as_mut(),
        frame,
        ntsc_crt::FrameIndex(args.frame),
        &ntsc_crt::VolumeStack::new(),
        Some(destination),
    )?;
    backend.shutdown();

    write_png(&args.out, &out)?;
    eprintln!(
        "wrote {} ({}, {:?})",
        args.out.display(),
        backend.name(),
        outcome
    );
    Ok(())
}

fn cmd_params() -> anyhow::Result<()> {
    println!("{}", ntsc_crt::EffectParams::default().to_json_pretty()?);
    Ok(())
}

fn cmd_showcase(args: ShowcaseArgs) -> anyhow::Result<()> {
    let registry = Arc::new(ntsc_crt::ShaderRegistry::new());
    let library = ntsc_crt::CpuDevice::shader_library();
    let caps = ntsc_crt::HostCapabilities::detect(&ntsc_crt::HostInfo::high_definition())?;
    let mut backend = ntsc_crt::create_backend(
        &caps,
        &library,
        Arc::clone(&registry),
        ntsc_crt::EffectParams::default(),
    );
    let mut device = ntsc_crt::CpuDevice::new(registry);
    let frame = read_png(&args.in_path)?;

    let mut volumes = ntsc_crt::VolumeStack::new();
    volumes.insert(ntsc_crt::NtscVolume::default());
    let mut cycle = ntsc_crt::ShowcaseCycle::new();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    for step in 0..args.steps {
        let Some(volume) = volumes.get_mut::<ntsc_crt::NtscVolume>() else {
            anyhow::bail!("showcase volume missing from stack");
        };
        if step == 0 {
            cycle.begin(volume);
        }
        cycle.step(volume);
        let label = cycle.label(volume);

        let (_, out) = device.render_still(
            backend.as_mut(),
            frame.clone(),
            ntsc_crt::FrameIndex(u64::from(step)),
            &volumes,
            None,
        )?;
        let path = args.out_dir.join(format!("step_{step:03}.png"));
        write_png(&path, &out)?;
        eprintln!("{}: {label}", path.display());
    }

    backend.shutdown();
    Ok(())
}
