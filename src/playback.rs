use anyhow::Result;
use std::time::Duration;

use crate::controls::ThresholdControls;
use crate::display::{Display, KeyCommand, CONTOURS_WINDOW};
use crate::models::{FrameReport, HsvBounds};
use crate::pipeline::Pipeline;
use crate::video::FrameSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// How long each iteration waits for a key press
    pub key_wait: Duration,
    /// Stop after this many iterations
    pub max_iterations: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            key_wait: Duration::from_millis(1),
            max_iterations: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Processed(FrameReport),
    Quit,
    EndOfStream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    EndOfStream,
    IterationLimit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub exit: ExitReason,
    pub frames_processed: u64,
    pub final_bounds: HsvBounds,
}

/// Reads frames, runs the detection pipeline and presents the result
///
/// The source is rewound whenever the frame counter reaches the source's
/// frame count, so playback loops until the operator quits. Source and
/// display are released by [`PlaybackLoop::close`], which also runs on drop.
pub struct PlaybackLoop<S: FrameSource, D: Display> {
    source: S,
    display: D,
    controls: ThresholdControls,
    pipeline: Pipeline,
    config: PlaybackConfig,
    frame_counter: u64,
    frames_processed: u64,
    closed: bool,
}

impl<S: FrameSource, D: Display> PlaybackLoop<S, D> {
    pub fn new(source: S, display: D, controls: ThresholdControls, pipeline: Pipeline) -> Self {
        Self {
            source,
            display,
            controls,
            pipeline,
            config: PlaybackConfig::default(),
            frame_counter: 0,
            frames_processed: 0,
            closed: false,
        }
    }

    pub fn with_config(mut self, config: PlaybackConfig) -> Self {
        self.config = config;
        self
    }

    pub fn controls(&self) -> &ThresholdControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ThresholdControls {
        &mut self.controls
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// One iteration: read, loop or restart if due, poll keys, detect, present
    pub fn step(&mut self) -> Result<StepOutcome> {
        self.frame_counter += 1;
        let Some(frame) = self.source.read()? else {
            tracing::warn!("No frame at position {}; stopping playback", self.frame_counter);
            return Ok(StepOutcome::EndOfStream);
        };
        let bounds = self.controls.bounds();
        let frame_number = self.frame_counter;

        let mut looped = false;
        if self.frame_counter == self.source.frame_count() {
            self.rewind()?;
            looped = true;
            tracing::debug!("Reached frame {}, looping to the start", frame_number);
        }

        let mut restarted = false;
        match self.display.poll_key(self.config.key_wait)? {
            Some(KeyCommand::Restart) => {
                self.rewind()?;
                restarted = true;
                println!("R pressed. Restarting...");
            }
            Some(KeyCommand::Quit) => {
                println!("Q pressed. Exiting...");
                return Ok(StepOutcome::Quit);
            }
            None => {}
        }

        let data = self.pipeline.run(frame, &bounds, frame_number)?;
        self.display.show(CONTOURS_WINDOW, &data.frame)?;
        self.frames_processed += 1;

        Ok(StepOutcome::Processed(FrameReport {
            frame_number,
            contour_count: data.contours.len(),
            outlined: data.outlined,
            detection: data.detection,
            looped,
            restarted,
        }))
    }

    /// Iterate until quit, end of stream or the iteration limit, then release
    pub fn run(&mut self) -> Result<RunSummary> {
        let exit = self.run_until_exit();
        let final_bounds = self.controls.bounds();
        self.close();
        let exit = exit?;

        println!("{}", final_bounds);
        tracing::info!("Playback finished ({:?}) after {} frames", exit, self.frames_processed);

        Ok(RunSummary {
            exit,
            frames_processed: self.frames_processed,
            final_bounds,
        })
    }

    fn run_until_exit(&mut self) -> Result<ExitReason> {
        let mut iterations = 0u64;
        loop {
            if let Some(max) = self.config.max_iterations {
                if iterations >= max {
                    return Ok(ExitReason::IterationLimit);
                }
            }
            iterations += 1;

            match self.step()? {
                StepOutcome::Processed(_) => {}
                StepOutcome::Quit => return Ok(ExitReason::Quit),
                StepOutcome::EndOfStream => return Ok(ExitReason::EndOfStream),
            }
        }
    }

    fn rewind(&mut self) -> Result<()> {
        self.frame_counter = 0;
        self.source.rewind()
    }

    /// Release the source and close the display; later calls do nothing
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.source.release();
        self.display.close_all();
        tracing::debug!("Released video source and closed display");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<S: FrameSource, D: Display> Drop for PlaybackLoop<S, D> {
    fn drop(&mut self) {
        self.close();
    }
}
