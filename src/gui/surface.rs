use anyhow::Result;
use image::RgbImage;
use std::collections::VecDeque;
use std::time::Duration;

use crate::display::{Display, KeyCommand};

/// Display surface backed by the iced window
///
/// Key presses arrive as window events and wait here until the playback
/// loop polls; the last presented frame waits until the view picks it up.
#[derive(Debug, Default)]
pub struct GuiSurface {
    pending_keys: VecDeque<KeyCommand>,
    latest: Option<RgbImage>,
}

impl GuiSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_key(&mut self, key: KeyCommand) {
        self.pending_keys.push_back(key);
    }

    pub fn take_frame(&mut self) -> Option<RgbImage> {
        self.latest.take()
    }
}

impl Display for GuiSurface {
    fn show(&mut self, _window: &str, frame: &RgbImage) -> Result<()> {
        self.latest = Some(frame.clone());
        Ok(())
    }

    fn poll_key(&mut self, _wait: Duration) -> Result<Option<KeyCommand>> {
        Ok(self.pending_keys.pop_front())
    }

    fn close_all(&mut self) {
        self.pending_keys.clear();
        self.latest = None;
    }
}
