pub mod controls;
pub mod detection;
pub mod display;
pub mod models;
pub mod pipeline;
pub mod playback;
pub mod video;

pub use controls::{ThresholdControls, Trackbar, TrackbarId};
pub use detection::build_standard_pipeline;
pub use display::{Display, HeadlessDisplay, KeyCommand};
pub use models::{Circle, Contour, Detection, FrameReport, HsvBounds};
pub use pipeline::{DebugConfig, FrameData, Pipeline, PipelineContext, PipelineStep};
pub use playback::{ExitReason, PlaybackConfig, PlaybackLoop, RunSummary, StepOutcome};
pub use video::{open_source, FrameSource, MemorySource};

#[cfg(feature = "gui")]
pub mod gui;
