mod input;
mod output;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use image::GrayImage;
use input::{LabPlanes, ScribbleSpec};
use matting::{Connectivity, Matter, MattingConfig};
use output::{OutputSink, PngOutput};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Neighbourhood {
    /// Horizontal and vertical neighbours
    Four,
    /// Also diagonal neighbours
    Eight,
}

impl From<Neighbourhood> for Connectivity {
    fn from(value: Neighbourhood) -> Self {
        match value {
            Neighbourhood::Four => Connectivity::Four,
            Neighbourhood::Eight => Connectivity::Eight,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input image (any format the image crate decodes)
    #[arg(short, long)]
    image: PathBuf,

    /// Scribble as LABEL:PATH where LABEL is fg or bg and PATH a mask image
    /// of the same size. Repeat to add more; applied in the order given
    #[arg(short, long = "scribble", value_name = "LABEL:PATH")]
    scribbles: Vec<ScribbleSpec>,

    /// Output path for the foreground mask
    #[arg(short, long, default_value = "mask.png")]
    output: PathBuf,

    /// Directory for likelihood and distance field visualizations
    #[arg(long)]
    dump_fields: Option<PathBuf>,

    /// Write the input image with background blacked out instead of the mask
    #[arg(long)]
    show_matte: bool,

    /// Pixel neighbourhood used for evidence propagation
    #[arg(long, value_enum, default_value_t = Neighbourhood::Four)]
    connectivity: Neighbourhood,

    /// Histogram bins per color channel
    #[arg(long, default_value_t = 32)]
    bins: usize,

    /// Color density smoothing bandwidth, in bins
    #[arg(long, default_value_t = 1.0)]
    bandwidth: f64,

    /// Cost of one pixel step
    #[arg(long, default_value_t = 1.0)]
    step_cost: f64,

    /// Cost per unit of Lab color difference between neighbours
    #[arg(long, default_value_t = 1.0)]
    color_weight: f64,

    /// Evidence distance at which likelihood falls by a factor of e
    #[arg(long, default_value_t = 16.0)]
    distance_scale: f64,

    /// Density floor added before combining with distance
    #[arg(long, default_value_t = 1e-6)]
    density_prior: f64,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn matting_config(&self) -> MattingConfig {
        MattingConfig {
            connectivity: self.connectivity.into(),
            bins: self.bins,
            bandwidth: self.bandwidth,
            step_cost: self.step_cost,
            color_weight: self.color_weight,
            distance_scale: self.distance_scale,
            density_prior: self.density_prior,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("Matting starting");
    tracing::info!("Scribbles: {}", args.scribbles.len());

    let config = args.matting_config();
    tracing::debug!("Configuration: {:?}", config);

    let planes = input::load_lab_planes(&args.image).context("Failed to load input image")?;

    let mut matter = Matter::with_config(
        &planes.l,
        &planes.a,
        &planes.b,
        planes.width,
        planes.height,
        config,
    )
    .context("Failed to start matting session")?;

    let mut sink = PngOutput::new(
        &args.output,
        args.dump_fields.clone(),
        planes.width,
        planes.height,
    )
    .context("Failed to initialize output")?;

    apply_scribbles(&mut matter, &args.scribbles, &planes)?;
    write_results(&matter, &mut sink, &planes, args.show_matte)?;

    Ok(())
}

fn apply_scribbles(matter: &mut Matter, specs: &[ScribbleSpec], planes: &LabPlanes) -> Result<()> {
    let mut total_time = Duration::ZERO;

    for spec in specs {
        let scribble = input::load_scribble(spec, planes.width, planes.height)
            .context("Failed to load scribble")?;
        let pixels = scribble.points.len();

        let start = Instant::now();
        matter
            .add_scribble(&scribble)
            .with_context(|| format!("Failed to apply scribble {}", spec.path.display()))?;
        let elapsed = start.elapsed();
        total_time += elapsed;

        tracing::info!(
            "Scribble {} ({:?}, {} px): {:.1}ms",
            spec.path.display(),
            spec.label,
            pixels,
            elapsed.as_secs_f64() * 1000.0
        );
    }

    tracing::info!(
        "Applied {} scribbles in {:.1}ms, state={:?}",
        matter.num_scribbles(),
        total_time.as_secs_f64() * 1000.0,
        matter.state()
    );
    Ok(())
}

fn write_results(
    matter: &Matter,
    sink: &mut PngOutput,
    planes: &LabPlanes,
    show_matte: bool,
) -> Result<()> {
    let (width, height) = sink.resolution();
    if (width, height) != (matter.width(), matter.height()) {
        bail!(
            "Output expects {}x{}, session is {}x{}",
            width,
            height,
            matter.width(),
            matter.height()
        );
    }
    let len = width as usize * height as usize;

    let mut mask = vec![0u8; len];
    matter
        .foreground_mask(&mut mask)
        .context("Failed to read foreground mask")?;
    let foreground = mask.iter().filter(|&&value| value > 0).count();
    tracing::info!(
        "Foreground: {} of {} pixels ({:.1}%)",
        foreground,
        len,
        foreground as f64 * 100.0 / len as f64
    );

    if show_matte {
        sink.write_composite(&planes.rgb, &mask)?;
    } else {
        let plane = GrayImage::from_raw(width, height, mask)
            .context("Mask does not match output resolution")?;
        sink.write_plane("mask", &plane)?;
    }

    if sink.dumps_fields() {
        let mut field = vec![0.0; len];

        matter.foreground_likelihood(&mut field)?;
        sink.write_plane("fg_likelihood", &output::field_to_gray(&field, width, height))?;
        matter.background_likelihood(&mut field)?;
        sink.write_plane("bg_likelihood", &output::field_to_gray(&field, width, height))?;
        matter.foreground_dist(&mut field)?;
        sink.write_plane("fg_dist", &output::field_to_gray(&field, width, height))?;
        matter.background_dist(&mut field)?;
        sink.write_plane("bg_dist", &output::field_to_gray(&field, width, height))?;
    }

    Ok(())
}
