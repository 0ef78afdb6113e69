use anyhow::Result;
use balltrack::{Display, FrameSource, HsvBounds, KeyCommand};
use image::{Rgb, RgbImage};
use std::collections::VecDeque;
use std::time::Duration;

/// Color constants for tests
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);

/// Range that keeps bright, unsaturated pixels (white)
pub fn white_bounds() -> HsvBounds {
    HsvBounds::new([0, 0, 200], [179, 30, 255])
}

pub fn solid_frame(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width, height, color)
}

/// Fill a `w`x`h` rectangle whose top-left corner is (x, y)
pub fn fill_rect(frame: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for py in y..y + h {
        for px in x..x + w {
            frame.put_pixel(px, py, color);
        }
    }
}

/// Black 100x100 frame with one white square
pub fn frame_with_square(x: u32, y: u32, size: u32) -> RgbImage {
    let mut frame = solid_frame(100, 100, BLACK);
    fill_rect(&mut frame, x, y, size, size, WHITE);
    frame
}

/// Display that records every presented frame and replays scripted keys
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub shown: Vec<RgbImage>,
    pub windows: Vec<String>,
    /// One entry per poll; an exhausted script means no key
    pub keys: VecDeque<Option<KeyCommand>>,
    pub polls: usize,
    pub closed: bool,
}

impl RecordingDisplay {
    pub fn with_keys(keys: Vec<Option<KeyCommand>>) -> Self {
        Self {
            keys: keys.into(),
            ..Self::default()
        }
    }
}

impl Display for RecordingDisplay {
    fn show(&mut self, window: &str, frame: &RgbImage) -> Result<()> {
        self.windows.push(window.to_string());
        self.shown.push(frame.clone());
        Ok(())
    }

    fn poll_key(&mut self, _wait: Duration) -> Result<Option<KeyCommand>> {
        self.polls += 1;
        Ok(self.keys.pop_front().flatten())
    }

    fn close_all(&mut self) {
        self.closed = true;
    }
}

/// Source that claims more frames than it holds
pub struct ShortSource {
    pub frames: VecDeque<RgbImage>,
    pub claimed: u64,
    pub released: bool,
}

impl FrameSource for ShortSource {
    fn read(&mut self) -> Result<Option<RgbImage>> {
        Ok(self.frames.pop_front())
    }

    fn frame_count(&self) -> u64 {
        self.claimed
    }

    fn rewind(&mut self) -> Result<()> {
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// Source whose reads always fail
pub struct FailingSource {
    pub released: bool,
}

impl FrameSource for FailingSource {
    fn read(&mut self) -> Result<Option<RgbImage>> {
        Err(anyhow::anyhow!("corrupt frame"))
    }

    fn frame_count(&self) -> u64 {
        10
    }

    fn rewind(&mut self) -> Result<()> {
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
    }
}
