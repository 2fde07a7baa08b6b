/// Bicubic upscaling with sharpening and edge-aware denoise.
use crate::constants::{
    DEFAULT_UPSCALE, DENOISE_LUMA_THRESHOLD, MAX_UPSCALE, MIN_UPSCALE, SHARPEN_KERNEL,
};
use crate::error::TextureError;
use crate::raster::{ChannelLayout, RasterImage};
use image::imageops::FilterType;
use rayon::prelude::*;

/// Closed-form image upscaler: bicubic (Catmull-Rom) resample, fixed 3x3
/// sharpen, then an edge-aware denoise on colour images. Output is fully
/// deterministic for a given input and scale.
pub struct ImageUpscaler {
    scale: f32,
}

impl Default for ImageUpscaler {
    fn default() -> Self {
        Self::new(DEFAULT_UPSCALE)
    }
}

impl ImageUpscaler {
    /// Create an upscaler; out-of-range or non-finite factors clamp into
    /// [1, 8] rather than erroring.
    pub fn new(scale: f32) -> Self {
        let scale = if scale.is_finite() {
            scale.clamp(MIN_UPSCALE, MAX_UPSCALE)
        } else {
            DEFAULT_UPSCALE
        };
        Self { scale }
    }

    /// Effective scale after clamping.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Produce the upscaled albedo. The target size is
    /// `floor(w * scale) x floor(h * scale)`; the input buffer is left
    /// untouched.
    pub fn upscale(&self, image: &RasterImage) -> Result<RasterImage, TextureError> {
        let target_w = ((image.width() as f32 * self.scale).floor() as u32).max(1);
        let target_h = ((image.height() as f32 * self.scale).floor() as u32).max(1);

        let resized = RasterImage::from_dynamic(&image.to_dynamic()?.resize_exact(
            target_w,
            target_h,
            FilterType::CatmullRom,
        ));

        let sharpened = sharpen(&resized)?;
        match sharpened.layout() {
            ChannelLayout::Rgb => denoise(&sharpened),
            ChannelLayout::Gray => Ok(sharpened),
        }
    }
}

/// Fixed 3x3 sharpening convolution with clamp-to-edge borders.
fn sharpen(image: &RasterImage) -> Result<RasterImage, TextureError> {
    let channels = image.channels() as usize;
    let width = image.width() as usize;
    let row_len = width * channels;
    let mut out = vec![0u8; image.data().len()];

    out.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        for x in 0..width {
            for c in 0..channels {
                let mut acc: i32 = 0;
                for (ky, kernel_row) in SHARPEN_KERNEL.iter().enumerate() {
                    for (kx, weight) in kernel_row.iter().enumerate() {
                        let sx = x as i64 + kx as i64 - 1;
                        let sy = y as i64 + ky as i64 - 1;
                        acc += weight * image.sample_clamped(sx, sy, c as u32) as i32;
                    }
                }
                row[x * channels + c] = acc.clamp(0, 255) as u8;
            }
        }
    });

    RasterImage::new(image.width(), image.height(), image.layout(), out)
}

/// Edge-aware smoothing: each pixel averages the 3x3 neighbours whose
/// luminance sits within a fixed delta of its own, so flat regions smooth
/// out while material edges survive. Colour images only.
fn denoise(image: &RasterImage) -> Result<RasterImage, TextureError> {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let luma: Vec<i16> = image.luminance().iter().map(|&v| v.round() as i16).collect();
    let row_len = width * 3;
    let mut out = vec![0u8; image.data().len()];

    out.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        for x in 0..width {
            let center = luma[y * width + x];
            let mut sums = [0u32; 3];
            let mut count = 0u32;
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let nx = (x as i64 + dx).clamp(0, width as i64 - 1) as usize;
                    let ny = (y as i64 + dy).clamp(0, height as i64 - 1) as usize;
                    if (luma[ny * width + nx] - center).abs() > DENOISE_LUMA_THRESHOLD {
                        continue;
                    }
                    for (c, sum) in sums.iter_mut().enumerate() {
                        *sum += image.get(nx as u32, ny as u32, c as u32) as u32;
                    }
                    count += 1;
                }
            }
            for (c, sum) in sums.iter().enumerate() {
                row[x * 3 + c] = ((sum + count / 2) / count) as u8;
            }
        }
    });

    RasterImage::new(image.width(), image.height(), image.layout(), out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_rgb(width: u32, height: u32) -> RasterImage {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 255 / (width + height - 2).max(1)) as u8;
                data.extend_from_slice(&[v, v / 2, 255 - v]);
            }
        }
        RasterImage::new(width, height, ChannelLayout::Rgb, data).unwrap()
    }

    #[test]
    fn output_dimensions_follow_floor_of_scale() {
        let image = gradient_rgb(5, 3);
        let out = ImageUpscaler::new(2.0).upscale(&image).unwrap();
        assert_eq!((out.width(), out.height()), (10, 6));

        let fractional = ImageUpscaler::new(1.5).upscale(&image).unwrap();
        assert_eq!((fractional.width(), fractional.height()), (7, 4));
    }

    #[test]
    fn out_of_range_scales_clamp() {
        assert_eq!(ImageUpscaler::new(0.25).scale(), 1.0);
        assert_eq!(ImageUpscaler::new(64.0).scale(), 8.0);
        assert_eq!(ImageUpscaler::new(f32::NAN).scale(), DEFAULT_UPSCALE);
    }

    #[test]
    fn upscale_is_byte_deterministic() {
        let image = gradient_rgb(8, 8);
        let upscaler = ImageUpscaler::new(2.0);
        let a = upscaler.upscale(&image).unwrap();
        let b = upscaler.upscale(&image).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn input_buffer_is_not_mutated() {
        let image = gradient_rgb(4, 4);
        let before = image.clone();
        let _ = ImageUpscaler::default().upscale(&image).unwrap();
        assert_eq!(image, before);
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let flat = RasterImage::new(4, 4, ChannelLayout::Rgb, vec![90; 48]).unwrap();
        let out = ImageUpscaler::new(2.0).upscale(&flat).unwrap();
        assert!(out.data().iter().all(|&v| v == 90));
    }

    #[test]
    fn grayscale_input_skips_denoise_and_keeps_one_channel() {
        let gray = RasterImage::new(4, 4, ChannelLayout::Gray, vec![120; 16]).unwrap();
        let out = ImageUpscaler::new(2.0).upscale(&gray).unwrap();
        assert_eq!(out.layout(), ChannelLayout::Gray);
        assert_eq!((out.width(), out.height()), (8, 8));
    }
}
