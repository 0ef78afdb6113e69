//! Tests for frame sources: directories, GIFs, still images and errors.

mod common;

use balltrack::video::{AnimationSource, ImageSequenceSource};
use balltrack::{open_source, FrameSource};
use image::codecs::gif::GifEncoder;
use image::{DynamicImage, Frame};
use std::fs::File;
use std::path::Path;
use tempfile::TempDir;

use common::*;

fn write_frames(dir: &Path) -> anyhow::Result<()> {
    // Saved out of order to check sorting
    frame_with_square(60, 60, 10).save(dir.join("frame_003.png"))?;
    frame_with_square(0, 0, 10).save(dir.join("frame_001.png"))?;
    frame_with_square(30, 30, 10).save(dir.join("frame_002.png"))?;
    std::fs::write(dir.join("notes.txt"), "not a frame")?;
    Ok(())
}

#[test]
fn test_image_directory_plays_in_name_order() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_frames(dir.path())?;

    let mut source = ImageSequenceSource::open(dir.path())?;

    assert_eq!(source.frame_count(), 3);
    let first = source.read()?.expect("frame 1");
    assert_eq!(*first.get_pixel(0, 0), WHITE);
    let second = source.read()?.expect("frame 2");
    assert_eq!(*second.get_pixel(30, 30), WHITE);
    assert_eq!(*second.get_pixel(0, 0), BLACK);
    assert!(source.read()?.is_some());
    assert!(source.read()?.is_none());

    source.rewind()?;
    assert_eq!(source.read()?.expect("frame 1 again"), first);
    Ok(())
}

#[test]
fn test_open_source_accepts_directory() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_frames(dir.path())?;

    let source = open_source(dir.path())?;

    assert_eq!(source.frame_count(), 3);
    Ok(())
}

#[test]
fn test_empty_directory_is_an_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let err = open_source(dir.path()).err().expect("empty directory");

    assert!(err.to_string().contains("No image frames"));
    Ok(())
}

#[test]
fn test_missing_source_is_an_error() {
    let err = open_source(Path::new("does/not/exist.gif")).err().expect("missing");
    assert!(err.to_string().contains("Video source not found"));
}

#[test]
fn test_video_container_suggests_extracting_frames() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("ball_video1.mp4");
    std::fs::write(&path, b"not really a video")?;

    let err = open_source(&path).err().expect("mp4");

    assert!(err.to_string().contains("extract the frames"));
    Ok(())
}

#[test]
fn test_animated_gif_yields_every_frame() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("clip.gif");
    {
        let mut encoder = GifEncoder::new(File::create(&path)?);
        for x in [10, 50] {
            let rgba = DynamicImage::ImageRgb8(frame_with_square(x, 20, 30)).to_rgba8();
            encoder.encode_frame(Frame::new(rgba))?;
        }
    }

    let mut source = AnimationSource::open(&path)?;

    assert_eq!(source.frame_count(), 2);
    let first = source.read()?.expect("frame 1");
    assert_eq!(first.dimensions(), (100, 100));
    // GIF palettes are quantized, so compare brightness rather than exact colors
    assert!(first.get_pixel(20, 30)[0] > 200);
    assert!(first.get_pixel(70, 30)[0] < 50);
    let second = source.read()?.expect("frame 2");
    assert!(second.get_pixel(70, 30)[0] > 200);
    assert!(source.read()?.is_none());

    source.release();
    assert!(source.read()?.is_none());
    Ok(())
}

#[test]
fn test_still_image_is_a_single_frame() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("still.png");
    frame_with_square(10, 10, 10).save(&path)?;

    let mut source = open_source(&path)?;

    assert_eq!(source.frame_count(), 1);
    assert!(source.read()?.is_some());
    assert!(source.read()?.is_none());
    Ok(())
}
