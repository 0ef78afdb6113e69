pub mod color;
pub mod contours;
pub mod geometry;
pub mod render;
pub mod steps;

use std::sync::Arc;
use crate::pipeline::Pipeline;
use render::RenderStyle;
use steps::{ColorMaskStep, ContourDetectionStep, RenderStep};

/// Build the mask → contours → render pipeline used for every frame
pub fn build_standard_pipeline(style: RenderStyle, verbose: bool) -> Pipeline {
    Pipeline::new()
        .with_verbose(verbose)
        .add_step(Arc::new(ColorMaskStep))
        .add_step(Arc::new(ContourDetectionStep))
        .add_step(Arc::new(RenderStep { style }))
}
