use image::{DynamicImage, GrayImage, RgbImage};
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Result;

use crate::models::{Contour, Detection, HsvBounds};

/// Data that flows through the pipeline for one frame
#[derive(Clone)]
pub struct FrameData {
    /// The color frame; drawing steps annotate it in place
    pub frame: RgbImage,

    /// Binary mask of the thresholded range (set by the mask step)
    pub mask: Option<GrayImage>,

    /// External contours of the mask (set by the contour step)
    pub contours: Vec<Contour>,

    /// Number of contours outlined above the area threshold
    pub outlined: usize,

    /// Largest contour of the frame, if any had an area
    pub detection: Option<Detection>,
}

impl FrameData {
    pub fn from_frame(frame: RgbImage) -> Self {
        Self {
            frame,
            mask: None,
            contours: Vec::new(),
            outlined: 0,
            detection: None,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
    /// Whether debug mode is enabled
    pub enabled: bool,
}

/// Context available to all pipeline steps for one frame
#[derive(Clone, Debug)]
pub struct PipelineContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
    pub bounds: HsvBounds,
    pub frame_number: u64,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    fn process(&self, data: FrameData, context: &PipelineContext) -> Result<FrameData>;

    /// Human-readable name for this step (used in verbose output)
    fn name(&self) -> &str;

    /// Image to dump for this step in debug mode
    fn debug_image(&self, _data: &FrameData) -> Option<DynamicImage> {
        None
    }
}

/// Composable per-frame pipeline
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    verbose: bool,
    debug: Option<DebugConfig>,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            verbose: false,
            debug: None,
        }
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig {
            output_dir,
            enabled: true,
        });

        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Helper method to add a step from a Box (for convenience)
    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(Arc::from(step));
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step on one frame
    pub fn run(&self, frame: RgbImage, bounds: &HsvBounds, frame_number: u64) -> Result<FrameData> {
        self.run_partial(frame, bounds, frame_number, self.steps.len())
    }

    /// Run the pipeline but stop after `num_steps` steps (useful for debugging)
    pub fn run_partial(
        &self,
        frame: RgbImage,
        bounds: &HsvBounds,
        frame_number: u64,
        num_steps: usize,
    ) -> Result<FrameData> {
        let context = PipelineContext {
            verbose: self.verbose,
            debug: self.debug.clone(),
            bounds: *bounds,
            frame_number,
        };

        let mut data = FrameData::from_frame(frame);

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            if context.verbose {
                tracing::debug!("Frame {}: running step {}", frame_number, step.name());
            }

            data = step.process(data, &context)?;
            save_debug_output(&context, step_idx, step.as_ref(), &data)?;
        }

        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Save the step's debug image as `<NN_step_name>/<frame>.png`
fn save_debug_output(
    context: &PipelineContext,
    step_idx: usize,
    step: &dyn PipelineStep,
    data: &FrameData,
) -> Result<()> {
    let Some(debug_config) = &context.debug else {
        return Ok(());
    };
    if !debug_config.enabled {
        return Ok(());
    }
    let Some(image) = step.debug_image(data) else {
        return Ok(());
    };

    let step_dir_name = format!("{:02}_{}", step_idx + 1,
        step.name().to_lowercase().replace(" ", "_"));
    let step_dir = debug_config.output_dir.join(&step_dir_name);
    std::fs::create_dir_all(&step_dir)?;

    let filename = format!("{:05}.png", context.frame_number);
    image.save(step_dir.join(&filename))
        .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;

    if context.verbose {
        tracing::debug!("Debug: saved {}/{}", step_dir_name, filename);
    }

    Ok(())
}
