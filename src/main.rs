use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use balltrack::controls::{load_preset, save_preset, ThresholdControls};
use balltrack::detection::build_standard_pipeline;
use balltrack::detection::render::{Marker, RenderStyle, DEFAULT_MIN_OUTLINE_AREA};
use balltrack::display::HeadlessDisplay;
use balltrack::pipeline::Pipeline;
use balltrack::playback::{PlaybackConfig, PlaybackLoop};
use balltrack::video::{open_source, FrameSource};

#[derive(Parser)]
#[command(name = "balltrack")]
#[command(about = "Track a colored ball in a video by HSV thresholding")]
struct Cli {
    /// Animated GIF, still image, or directory of frames
    #[arg(value_name = "VIDEO", default_value = "videos/ball_video1.gif")]
    video: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Run without a window (always on when built without the `gui` feature)
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames
    #[arg(long, value_name = "N")]
    max_frames: Option<u64>,

    /// Write every annotated frame to this directory (headless mode)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Save per-step debug images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Load initial thresholds from a JSON preset
    #[arg(long, value_name = "FILE")]
    thresholds: Option<PathBuf>,

    /// Write the final thresholds to a JSON preset on exit
    #[arg(long, value_name = "FILE")]
    save_thresholds: Option<PathBuf>,

    /// Outline contours larger than this area
    #[arg(long, default_value_t = DEFAULT_MIN_OUTLINE_AREA)]
    min_area: f64,

    /// Draw the ball marker as a filled disc
    #[arg(long)]
    fill_marker: bool,

    /// Key poll wait per frame, in milliseconds
    #[arg(long, default_value_t = 1)]
    key_wait_ms: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let controls = match &args.thresholds {
        Some(path) => ThresholdControls::from_bounds(&load_preset(path)?),
        None => ThresholdControls::new(),
    };

    let source = open_source(&args.video)?;
    let pipeline = build_pipeline(&args)?;

    if args.headless || cfg!(not(feature = "gui")) {
        return run_headless(&args, source, controls, pipeline);
    }

    #[cfg(feature = "gui")]
    {
        let playback = PlaybackLoop::new(source, balltrack::gui::GuiSurface::new(), controls, pipeline)
            .with_config(playback_config(&args));
        let settings = balltrack::gui::GuiSettings {
            tick: Duration::from_millis(args.key_wait_ms.max(1)),
            save_thresholds: args.save_thresholds.clone(),
        };
        balltrack::gui::run(playback, settings)
            .map_err(|e| anyhow::anyhow!("GUI error: {}", e))?;
    }

    Ok(())
}

fn build_pipeline(args: &Cli) -> anyhow::Result<Pipeline> {
    let style = RenderStyle {
        min_outline_area: args.min_area,
        marker: if args.fill_marker { Marker::Filled } else { Marker::Hollow { thickness: 2 } },
        ..RenderStyle::default()
    };

    let mut pipeline = build_standard_pipeline(style, args.verbose);
    if let Some(debug_dir) = &args.debug_out {
        pipeline = pipeline.with_debug(debug_dir.clone())?;
    }
    Ok(pipeline)
}

fn playback_config(args: &Cli) -> PlaybackConfig {
    PlaybackConfig {
        key_wait: Duration::from_millis(args.key_wait_ms),
        max_iterations: args.max_frames,
    }
}

fn run_headless(
    args: &Cli,
    source: Box<dyn FrameSource + Send>,
    controls: ThresholdControls,
    pipeline: Pipeline,
) -> anyhow::Result<()> {
    let mut display = HeadlessDisplay::new();
    if let Some(dir) = &args.output_dir {
        display = display.with_output_dir(dir.clone())?;
    }

    // Without a window nobody can press 'q', so a looping clip needs a budget
    let config = PlaybackConfig {
        max_iterations: args.max_frames.or(Some(source.frame_count())),
        ..playback_config(args)
    };

    let mut playback = PlaybackLoop::new(source, display, controls, pipeline).with_config(config);
    let summary = playback.run()?;

    if let Some(path) = &args.save_thresholds {
        save_preset(path, &summary.final_bounds)?;
    }

    if args.verbose {
        println!("Processed {} frames ({:?})", summary.frames_processed, summary.exit);
    }
    Ok(())
}
