use anyhow::{Context, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, ImageReader, RgbImage};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Container formats the image stack cannot decode
const VIDEO_CONTAINERS: [&str; 5] = ["mp4", "avi", "mov", "mkv", "webm"];
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff"];

/// A seekable stream of color frames
pub trait FrameSource {
    /// Next frame, or None once the stream is exhausted
    fn read(&mut self) -> Result<Option<RgbImage>>;

    /// Total number of frames the source reports
    fn frame_count(&self) -> u64;

    /// Seek back to the first frame
    fn rewind(&mut self) -> Result<()>;

    /// Drop any held decoder state; called once when playback ends
    fn release(&mut self) {}
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn read(&mut self) -> Result<Option<RgbImage>> {
        (**self).read()
    }

    fn frame_count(&self) -> u64 {
        (**self).frame_count()
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Frames held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    frames: Vec<RgbImage>,
    position: usize,
}

impl MemorySource {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self { frames, position: 0 }
    }

    /// Index of the frame the next read returns
    pub fn position(&self) -> usize {
        self.position
    }
}

impl FrameSource for MemorySource {
    fn read(&mut self) -> Result<Option<RgbImage>> {
        let frame = self.frames.get(self.position).cloned();
        if frame.is_some() {
            self.position += 1;
        }
        Ok(frame)
    }

    fn frame_count(&self) -> u64 {
        self.frames.len() as u64
    }

    fn rewind(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }

    fn release(&mut self) {
        self.frames.clear();
        self.position = 0;
    }
}

/// Every frame of an animated GIF, or a still image as a one-frame clip
pub struct AnimationSource {
    inner: MemorySource,
}

impl AnimationSource {
    pub fn open(path: &Path) -> Result<Self> {
        let is_gif = extension(path).as_deref() == Some("gif");
        let frames = if is_gif {
            let reader = BufReader::new(
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
            );
            let decoder = GifDecoder::new(reader)
                .map_err(|e| anyhow::anyhow!("Failed to decode GIF {}: {}", path.display(), e))?;
            decoder
                .into_frames()
                .collect_frames()
                .map_err(|e| anyhow::anyhow!("Failed to decode GIF frames: {}", e))?
                .into_iter()
                .map(|frame| DynamicImage::ImageRgba8(frame.into_buffer()).to_rgb8())
                .collect()
        } else {
            vec![decode_rgb(path)?]
        };

        if frames.is_empty() {
            anyhow::bail!("{} contains no frames", path.display());
        }

        tracing::info!("Decoded {} frame(s) from {}", frames.len(), path.display());
        Ok(Self { inner: MemorySource::new(frames) })
    }
}

impl FrameSource for AnimationSource {
    fn read(&mut self) -> Result<Option<RgbImage>> {
        self.inner.read()
    }

    fn frame_count(&self) -> u64 {
        self.inner.frame_count()
    }

    fn rewind(&mut self) -> Result<()> {
        self.inner.rewind()
    }

    fn release(&mut self) {
        self.inner.release()
    }
}

/// A directory of still images played back in file-name order
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    position: usize,
}

impl ImageSequenceSource {
    pub fn open(dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read frame directory {}", dir.display()))?
        {
            let path = entry?.path();
            let is_image = extension(&path)
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
                .unwrap_or(false);
            if path.is_file() && is_image {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            anyhow::bail!("No image frames found in {}", dir.display());
        }

        tracing::info!("Found {} frames in {}", paths.len(), dir.display());
        Ok(Self { paths, position: 0 })
    }
}

impl FrameSource for ImageSequenceSource {
    fn read(&mut self) -> Result<Option<RgbImage>> {
        let Some(path) = self.paths.get(self.position) else {
            return Ok(None);
        };
        let frame = decode_rgb(path)?;
        self.position += 1;
        Ok(Some(frame))
    }

    fn frame_count(&self) -> u64 {
        self.paths.len() as u64
    }

    fn rewind(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }
}

/// Open a frame source for a directory, an animated GIF or a still image
pub fn open_source(path: &Path) -> Result<Box<dyn FrameSource + Send>> {
    if !path.exists() {
        anyhow::bail!("Video source not found: {}", path.display());
    }

    if path.is_dir() {
        return Ok(Box::new(ImageSequenceSource::open(path)?));
    }

    if let Some(ext) = extension(path) {
        if VIDEO_CONTAINERS.contains(&ext.as_str()) {
            anyhow::bail!(
                "Cannot decode {} containers ({}); extract the frames first, e.g. \
                 `ffmpeg -i {} frames/%05d.png`, and pass the directory",
                ext,
                path.display(),
                path.display()
            );
        }
    }

    Ok(Box::new(AnimationSource::open(path)?))
}

fn decode_rgb(path: &Path) -> Result<RgbImage> {
    let img = ImageReader::open(path)
        .with_context(|| format!("Failed to open frame {}", path.display()))?
        .with_guessed_format()?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode frame {}: {}", path.display(), e))?;
    Ok(img.to_rgb8())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
