use crate::pipeline::{FrameData, PipelineStep, PipelineContext};
use crate::detection::{color, contours, render};
use crate::detection::render::RenderStyle;
use anyhow::Result;
use image::DynamicImage;

/// Threshold the frame's HSV representation into a binary mask
pub struct ColorMaskStep;

impl PipelineStep for ColorMaskStep {
    fn process(&self, mut data: FrameData, context: &PipelineContext) -> Result<FrameData> {
        let mask = color::filter_color(&data.frame, &context.bounds);
        if context.verbose {
            tracing::debug!(
                "Mask for {}: {} foreground pixels",
                context.bounds,
                color::count_foreground(&mask)
            );
        }
        data.mask = Some(mask);
        Ok(data)
    }

    fn name(&self) -> &str {
        "Color Mask"
    }

    fn debug_image(&self, data: &FrameData) -> Option<DynamicImage> {
        data.mask.clone().map(DynamicImage::ImageLuma8)
    }
}

/// Extract the external contours of the mask
pub struct ContourDetectionStep;

impl PipelineStep for ContourDetectionStep {
    fn process(&self, mut data: FrameData, context: &PipelineContext) -> Result<FrameData> {
        let mask = data.mask.as_ref()
            .ok_or_else(|| anyhow::anyhow!("Contour detection needs a mask; run the color mask step first"))?;
        data.contours = contours::find_external_contours(mask);

        if context.verbose {
            tracing::debug!("Found {} contours", data.contours.len());
            for (i, contour) in data.contours.iter().take(10).enumerate() {
                tracing::debug!("  Contour {}: points={}, area={:.1}", i + 1, contour.len(), contour.area());
            }
        }
        Ok(data)
    }

    fn name(&self) -> &str {
        "Contour Detection"
    }
}

/// Outline large contours and mark the largest one
pub struct RenderStep {
    pub style: RenderStyle,
}

impl PipelineStep for RenderStep {
    fn process(&self, mut data: FrameData, context: &PipelineContext) -> Result<FrameData> {
        let summary = render::draw_ball_contour(&mut data.frame, &data.contours, &self.style);
        data.outlined = summary.outlined;
        data.detection = summary.detection;

        if context.verbose {
            match &data.detection {
                Some(d) => tracing::debug!(
                    "Ball at ({}, {}) radius {:.1}, area {:.1}",
                    d.centroid.0, d.centroid.1, d.circle.radius, d.area
                ),
                None => tracing::debug!("No detection this frame"),
            }
        }
        Ok(data)
    }

    fn name(&self) -> &str {
        "Contour Rendering"
    }

    fn debug_image(&self, data: &FrameData) -> Option<DynamicImage> {
        Some(DynamicImage::ImageRgb8(data.frame.clone()))
    }
}
