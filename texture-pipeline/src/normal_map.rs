/// Tangent-space normal map synthesis from albedo luminance.
use crate::constants::{NORMAL_EPSILON, NORMAL_STRENGTH, SOBEL_X, SOBEL_Y};
use crate::error::TextureError;
use crate::raster::{ChannelLayout, RasterImage};
use rayon::prelude::*;

/// Gradient-based normal map synthesizer. Luminance slopes become
/// per-pixel surface vectors; the fixed Z strength controls how flat the
/// map reads (larger = flatter).
pub struct NormalMapSynthesizer {
    strength: f32,
}

impl Default for NormalMapSynthesizer {
    fn default() -> Self {
        Self::new(NORMAL_STRENGTH)
    }
}

impl NormalMapSynthesizer {
    pub fn new(strength: f32) -> Self {
        Self { strength }
    }

    /// Synthesize a 3-channel normal map with the input's dimensions.
    ///
    /// The output byte order is the contract here: R holds the X-derived
    /// component, G the Y-derived component, B the constant Z component.
    /// Downstream renderers decode slope from exactly that convention.
    /// Flat input produces a uniform (128, 128, 255) map.
    pub fn synthesize(&self, image: &RasterImage) -> Result<RasterImage, TextureError> {
        if image.width() < 2 || image.height() < 2 {
            return Err(TextureError::DegenerateImage {
                stage: "normal map synthesis",
                width: image.width(),
                height: image.height(),
            });
        }

        let width = image.width() as usize;
        let luma = image.luminance();
        let strength = self.strength;
        let mut out = vec![0u8; width * image.height() as usize * 3];

        out.par_chunks_mut(width * 3)
            .enumerate()
            .for_each(|(y, row)| {
                for x in 0..width {
                    let (gx, gy) = sobel_at(&luma, width, image.height() as usize, x, y);
                    let (nx, ny, nz) = normalize(-gx, -gy, strength);
                    row[x * 3] = remap(nx);
                    row[x * 3 + 1] = remap(ny);
                    row[x * 3 + 2] = remap(nz);
                }
            });

        RasterImage::new(image.width(), image.height(), ChannelLayout::Rgb, out)
    }
}

/// 3x3 Sobel gradients at one pixel, clamp-to-edge at the borders.
fn sobel_at(luma: &[f32], width: usize, height: usize, x: usize, y: usize) -> (f32, f32) {
    let mut gx = 0.0f32;
    let mut gy = 0.0f32;
    for ky in 0..3 {
        for kx in 0..3 {
            let sx = (x as i64 + kx as i64 - 1).clamp(0, width as i64 - 1) as usize;
            let sy = (y as i64 + ky as i64 - 1).clamp(0, height as i64 - 1) as usize;
            let v = luma[sy * width + sx];
            gx += SOBEL_X[ky][kx] * v;
            gy += SOBEL_Y[ky][kx] * v;
        }
    }
    (gx, gy)
}

/// Unit-normalize with an epsilon-guarded denominator so zero-variance
/// gradient fields divide cleanly.
fn normalize(x: f32, y: f32, z: f32) -> (f32, f32, f32) {
    let len = (x * x + y * y + z * z).sqrt() + NORMAL_EPSILON;
    (x / len, y / len, z / len)
}

/// Remap a unit component from [-1, 1] to [0, 255].
fn remap(v: f32) -> u8 {
    ((v + 1.0) * 0.5 * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_input_yields_neutral_normal() {
        let flat = RasterImage::new(6, 6, ChannelLayout::Rgb, vec![77; 108]).unwrap();
        let map = NormalMapSynthesizer::default().synthesize(&flat).unwrap();
        assert_eq!(map.layout(), ChannelLayout::Rgb);
        for px in map.data().chunks_exact(3) {
            assert_eq!(px, &[128, 128, 255]);
        }
    }

    #[test]
    fn horizontal_ramp_tilts_only_the_red_channel() {
        // Luminance rises left to right, so X gradients are positive,
        // Y gradients are zero everywhere.
        let mut data = Vec::new();
        for _y in 0..4 {
            for x in 0..4u32 {
                data.push((x * 40) as u8);
            }
        }
        let ramp = RasterImage::new(4, 4, ChannelLayout::Gray, data).unwrap();
        let map = NormalMapSynthesizer::default().synthesize(&ramp).unwrap();

        let center = &map.data()[(1 * 4 + 1) * 3..(1 * 4 + 1) * 3 + 3];
        assert!(center[0] < 128, "red should tilt negative, got {}", center[0]);
        assert_eq!(center[1], 128, "green must stay neutral on a horizontal ramp");
        assert!(center[2] > 128);
    }

    #[test]
    fn vertical_ramp_tilts_only_the_green_channel() {
        let mut data = Vec::new();
        for y in 0..4u32 {
            for _x in 0..4 {
                data.push((y * 40) as u8);
            }
        }
        let ramp = RasterImage::new(4, 4, ChannelLayout::Gray, data).unwrap();
        let map = NormalMapSynthesizer::default().synthesize(&ramp).unwrap();

        let center = &map.data()[(1 * 4 + 1) * 3..(1 * 4 + 1) * 3 + 3];
        assert_eq!(center[0], 128, "red must stay neutral on a vertical ramp");
        assert!(center[1] < 128, "green should tilt negative, got {}", center[1]);
    }

    #[test]
    fn degenerate_geometry_is_reported_not_crashed() {
        let tiny = RasterImage::new(1, 1, ChannelLayout::Gray, vec![0]).unwrap();
        let err = NormalMapSynthesizer::default().synthesize(&tiny).unwrap_err();
        assert!(matches!(err, TextureError::DegenerateImage { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn output_never_contains_nan_artifacts() {
        // Alternating extreme pixels drive large gradients; every byte
        // must still land in range with unit-length vectors.
        let mut data = vec![0u8; 64];
        for (i, v) in data.iter_mut().enumerate() {
            *v = if i % 2 == 0 { 0 } else { 255 };
        }
        let noisy = RasterImage::new(8, 8, ChannelLayout::Gray, data).unwrap();
        let map = NormalMapSynthesizer::default().synthesize(&noisy).unwrap();
        assert_eq!(map.data().len(), 8 * 8 * 3);
    }
}
