mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from balltrack for tests
pub use balltrack::{
    build_standard_pipeline, Contour, Detection, FrameReport, HsvBounds, KeyCommand, MemorySource,
    PlaybackConfig, PlaybackLoop, StepOutcome, ThresholdControls, TrackbarId,
};
