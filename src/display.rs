use anyhow::{Context, Result};
use image::RgbImage;
use std::path::PathBuf;
use std::time::Duration;

pub const CONTOURS_WINDOW: &str = "RGB Image Contours";

/// Operator commands recognised by the playback loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Restart,
    Quit,
}

impl KeyCommand {
    /// 'r' restarts, 'q' quits, every other key is ignored
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'r' => Some(KeyCommand::Restart),
            'q' => Some(KeyCommand::Quit),
            _ => None,
        }
    }
}

/// Where annotated frames are presented and key presses come from
pub trait Display {
    fn show(&mut self, window: &str, frame: &RgbImage) -> Result<()>;

    /// Wait up to `wait` for a key press
    fn poll_key(&mut self, wait: Duration) -> Result<Option<KeyCommand>>;

    fn close_all(&mut self) {}
}

/// Display without a window; optionally saves every frame it is shown
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    output_dir: Option<PathBuf>,
    shown: u64,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save every shown frame as PNG into this directory
    pub fn with_output_dir(mut self, dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        self.output_dir = Some(dir);
        Ok(self)
    }

    pub fn frames_shown(&self) -> u64 {
        self.shown
    }
}

impl Display for HeadlessDisplay {
    fn show(&mut self, window: &str, frame: &RgbImage) -> Result<()> {
        self.shown += 1;
        if let Some(dir) = &self.output_dir {
            let slug = window.to_lowercase().replace(' ', "_");
            let path = dir.join(format!("{}_{:05}.png", slug, self.shown));
            frame
                .save(&path)
                .map_err(|e| anyhow::anyhow!("Failed to save frame {}: {}", path.display(), e))?;
            tracing::debug!("Saved {}", path.display());
        }
        Ok(())
    }

    fn poll_key(&mut self, _wait: Duration) -> Result<Option<KeyCommand>> {
        Ok(None)
    }
}
