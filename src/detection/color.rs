use image::{GrayImage, Luma, Rgb, RgbImage};
use crate::models::HsvBounds;

pub const MASK_ON: u8 = 255;
pub const MASK_OFF: u8 = 0;

/// Convert one RGB pixel to 8-bit HSV (hue 0-179, saturation and value 0-255)
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f32;

    let s = if max == 0 {
        0
    } else {
        (255.0 * delta / max as f32).round() as u8
    };

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g as f32 - b as f32) / delta
    } else if max == g {
        120.0 + 60.0 * (b as f32 - r as f32) / delta
    } else {
        240.0 + 60.0 * (r as f32 - g as f32) / delta
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    // Half-degree hue so it fits a byte; 360 wraps back to 0
    let mut h_half = (h / 2.0).round() as u32;
    if h_half >= 180 {
        h_half -= 180;
    }

    [h_half as u8, s, max]
}

/// Convert a whole frame to HSV; channels hold (h, s, v)
pub fn to_hsv(img: &RgbImage) -> RgbImage {
    let mut hsv = RgbImage::new(img.width(), img.height());
    for (x, y, Rgb([r, g, b])) in img.enumerate_pixels() {
        hsv.put_pixel(x, y, Rgb(rgb_to_hsv(*r, *g, *b)));
    }
    hsv
}

/// Mark every HSV pixel that lies inside the bounds
pub fn in_range(hsv: &RgbImage, bounds: &HsvBounds) -> GrayImage {
    let mut mask = GrayImage::new(hsv.width(), hsv.height());
    for (x, y, pixel) in hsv.enumerate_pixels() {
        let value = if bounds.contains(pixel.0) { MASK_ON } else { MASK_OFF };
        mask.put_pixel(x, y, Luma([value]));
    }
    mask
}

/// Threshold a color frame into a binary mask of the requested HSV range
pub fn filter_color(frame: &RgbImage, bounds: &HsvBounds) -> GrayImage {
    in_range(&to_hsv(frame), bounds)
}

/// Number of foreground pixels in a mask
pub fn count_foreground(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] != MASK_OFF).count()
}
