//! Integration tests for the playback loop.
//!
//! Tests cover:
//! - End-to-end detection of a white square
//! - Automatic looping when the frame counter reaches the frame count
//! - 'r' restart and 'q' quit commands
//! - End of stream, read failures and resource release

mod common;

use balltrack::detection::render::{RenderStyle, OUTLINE_COLOR};
use balltrack::{ExitReason, HeadlessDisplay};
use std::collections::VecDeque;

use common::*;

fn white_controls() -> ThresholdControls {
    ThresholdControls::from_bounds(&white_bounds())
}

fn three_frames() -> Vec<image::RgbImage> {
    vec![
        frame_with_square(5, 5, 20),
        frame_with_square(40, 40, 20),
        frame_with_square(70, 10, 20),
    ]
}

fn new_loop(
    frames: Vec<image::RgbImage>,
    display: RecordingDisplay,
) -> PlaybackLoop<MemorySource, RecordingDisplay> {
    PlaybackLoop::new(
        MemorySource::new(frames),
        display,
        white_controls(),
        build_standard_pipeline(RenderStyle::default(), false),
    )
}

fn processed(outcome: StepOutcome) -> FrameReport {
    match outcome {
        StepOutcome::Processed(report) => report,
        other => panic!("expected a processed frame, got {:?}", other),
    }
}

#[test]
fn test_white_square_end_to_end() -> anyhow::Result<()> {
    let mut playback = new_loop(vec![frame_with_square(35, 35, 30)], RecordingDisplay::default());

    let report = processed(playback.step()?);

    assert_eq!(report.contour_count, 1);
    assert_eq!(report.outlined, 0);
    let detection = report.detection.expect("detection");
    let (cx, cy) = detection.centroid;
    assert!((35..65).contains(&cx) && (35..65).contains(&cy));
    assert!(detection.circle.radius >= 15.0);

    let display = playback.display();
    assert_eq!(display.shown.len(), 1);
    assert_eq!(display.windows[0], "RGB Image Contours");
    assert_eq!(*display.shown[0].get_pixel(64, 50), OUTLINE_COLOR);
    Ok(())
}

#[test]
fn test_frame_without_detection_is_still_presented() -> anyhow::Result<()> {
    let mut playback = new_loop(vec![solid_frame(50, 50, BLACK)], RecordingDisplay::default());

    let report = processed(playback.step()?);

    assert_eq!(report.contour_count, 0);
    assert!(report.detection.is_none());
    assert_eq!(playback.display().shown.len(), 1);
    Ok(())
}

#[test]
fn test_reaching_frame_count_loops_to_first_frame() -> anyhow::Result<()> {
    let mut playback = new_loop(three_frames(), RecordingDisplay::default());

    assert!(!processed(playback.step()?).looped);
    assert!(!processed(playback.step()?).looped);
    let third = processed(playback.step()?);
    assert!(third.looped);
    assert_eq!(third.frame_number, 3);
    assert_eq!(playback.frame_counter(), 0);
    assert_eq!(playback.source().position(), 0);

    let fourth = processed(playback.step()?);
    assert_eq!(fourth.frame_number, 1);

    let shown = &playback.display().shown;
    assert_eq!(shown.len(), 4);
    assert_eq!(shown[3], shown[0]);
    assert_ne!(shown[1], shown[0]);
    Ok(())
}

#[test]
fn test_restart_key_rewinds_playback() -> anyhow::Result<()> {
    let display = RecordingDisplay::with_keys(vec![None, Some(KeyCommand::Restart)]);
    let mut playback = new_loop(three_frames(), display);

    processed(playback.step()?);
    let second = processed(playback.step()?);
    assert!(second.restarted);
    assert_eq!(playback.frame_counter(), 0);

    // The frame read before the restart is still shown, then playback starts over
    let third = processed(playback.step()?);
    assert_eq!(third.frame_number, 1);
    let shown = &playback.display().shown;
    assert_eq!(shown[2], shown[0]);
    Ok(())
}

#[test]
fn test_quit_key_stops_before_processing() -> anyhow::Result<()> {
    let display = RecordingDisplay::with_keys(vec![None, Some(KeyCommand::Quit)]);
    let mut playback = new_loop(three_frames(), display);

    processed(playback.step()?);
    assert_eq!(playback.step()?, StepOutcome::Quit);
    assert_eq!(playback.display().shown.len(), 1);
    Ok(())
}

#[test]
fn test_run_until_quit_releases_resources() -> anyhow::Result<()> {
    let display = RecordingDisplay::with_keys(vec![None, None, Some(KeyCommand::Quit)]);
    let mut playback = new_loop(three_frames(), display);
    playback.controls_mut().set(TrackbarId::ValMin, 180);

    let summary = playback.run()?;

    assert_eq!(summary.exit, ExitReason::Quit);
    assert_eq!(summary.frames_processed, 2);
    assert_eq!(summary.final_bounds, HsvBounds::new([0, 0, 180], [179, 30, 255]));
    assert!(playback.is_closed());
    assert!(playback.display().closed);
    Ok(())
}

#[test]
fn test_iteration_limit_ends_run() -> anyhow::Result<()> {
    let mut playback = new_loop(three_frames(), RecordingDisplay::default()).with_config(PlaybackConfig {
        max_iterations: Some(5),
        ..PlaybackConfig::default()
    });

    let summary = playback.run()?;

    assert_eq!(summary.exit, ExitReason::IterationLimit);
    assert_eq!(summary.frames_processed, 5);
    assert_eq!(playback.display().shown.len(), 5);
    Ok(())
}

#[test]
fn test_end_of_stream_terminates_cleanly() -> anyhow::Result<()> {
    let source = ShortSource {
        frames: VecDeque::from(vec![frame_with_square(10, 10, 10)]),
        claimed: 10,
        released: false,
    };
    let mut playback = PlaybackLoop::new(
        source,
        RecordingDisplay::default(),
        white_controls(),
        build_standard_pipeline(RenderStyle::default(), false),
    );

    let summary = playback.run()?;

    assert_eq!(summary.exit, ExitReason::EndOfStream);
    assert_eq!(summary.frames_processed, 1);
    assert!(playback.source().released);
    assert!(playback.display().closed);
    Ok(())
}

#[test]
fn test_read_failure_propagates_after_release() {
    let mut playback = PlaybackLoop::new(
        FailingSource { released: false },
        RecordingDisplay::default(),
        white_controls(),
        build_standard_pipeline(RenderStyle::default(), false),
    );

    let err = playback.run().expect_err("read failure");

    assert!(err.to_string().contains("corrupt frame"));
    assert!(playback.source().released);
    assert!(playback.display().closed);
    assert!(playback.display().shown.is_empty());
}

#[test]
fn test_threshold_changes_apply_on_next_frame() -> anyhow::Result<()> {
    let mut playback = new_loop(three_frames(), RecordingDisplay::default());

    assert!(processed(playback.step()?).detection.is_some());

    // Nothing white survives a saturation floor of 200
    playback.controls_mut().set(TrackbarId::SatMin, 200);
    assert!(processed(playback.step()?).detection.is_none());
    Ok(())
}

#[test]
fn test_headless_display_writes_numbered_frames() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let display = HeadlessDisplay::new().with_output_dir(dir.path().join("frames"))?;
    let mut playback = PlaybackLoop::new(
        MemorySource::new(three_frames()),
        display,
        white_controls(),
        build_standard_pipeline(RenderStyle::default(), false),
    )
    .with_config(PlaybackConfig {
        max_iterations: Some(3),
        ..PlaybackConfig::default()
    });

    playback.run()?;

    assert_eq!(playback.display().frames_shown(), 3);
    for n in 1..=3 {
        let path = dir.path().join("frames").join(format!("rgb_image_contours_{:05}.png", n));
        assert!(path.exists(), "missing {}", path.display());
    }
    Ok(())
}
