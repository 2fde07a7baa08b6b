/// Displacement map synthesis via adaptive local-contrast equalization.
use crate::constants::{CLAHE_CLIP_LIMIT, CLAHE_TILE_GRID};
use crate::error::TextureError;
use crate::raster::{ChannelLayout, RasterImage};

/// Produces a single-channel pseudo-height field from albedo luminance.
///
/// Lighter pixels are treated as higher ground. That is a deliberately
/// simplistic stand-in for real depth, driven by weave texture showing up
/// as brightness variation; it is not corrected or calibrated.
pub struct DisplacementMapSynthesizer {
    clip_limit: f32,
}

impl Default for DisplacementMapSynthesizer {
    fn default() -> Self {
        Self::new(CLAHE_CLIP_LIMIT)
    }
}

impl DisplacementMapSynthesizer {
    pub fn new(clip_limit: f32) -> Self {
        Self { clip_limit }
    }

    /// Equalize luminance contrast tile by tile, blending tile lookup
    /// tables bilinearly so tile seams never show. Same dimensions as
    /// the input, always one channel.
    pub fn synthesize(&self, image: &RasterImage) -> Result<RasterImage, TextureError> {
        if image.width() < 2 || image.height() < 2 {
            return Err(TextureError::DegenerateImage {
                stage: "displacement synthesis",
                width: image.width(),
                height: image.height(),
            });
        }

        let width = image.width() as usize;
        let height = image.height() as usize;
        let luma = image.luminance_u8();

        let cols = (CLAHE_TILE_GRID as usize).min(width);
        let rows = (CLAHE_TILE_GRID as usize).min(height);
        let luts = build_tile_luts(&luma, width, height, cols, rows, self.clip_limit);

        let mut out = vec![0u8; width * height];
        for (y, row) in out.chunks_mut(width).enumerate() {
            for (x, pixel) in row.iter_mut().enumerate() {
                let v = luma[y * width + x] as usize;
                *pixel = blend_luts(&luts, cols, rows, width, height, x, y, v);
            }
        }

        RasterImage::new(image.width(), image.height(), ChannelLayout::Gray, out)
    }
}

/// Per-tile equalization lookup tables with histogram clipping.
fn build_tile_luts(
    luma: &[u8],
    width: usize,
    height: usize,
    cols: usize,
    rows: usize,
    clip_limit: f32,
) -> Vec<[u8; 256]> {
    let mut luts = Vec::with_capacity(cols * rows);
    for ty in 0..rows {
        for tx in 0..cols {
            let x0 = tx * width / cols;
            let x1 = (tx + 1) * width / cols;
            let y0 = ty * height / rows;
            let y1 = (ty + 1) * height / rows;

            let mut histogram = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    histogram[luma[y * width + x] as usize] += 1;
                }
            }
            let area = ((x1 - x0) * (y1 - y0)) as u32;
            luts.push(equalize(&mut histogram, area, clip_limit));
        }
    }
    luts
}

/// Clip the histogram at the limit, redistribute the excess uniformly,
/// then map values through the cumulative distribution.
fn equalize(histogram: &mut [u32; 256], area: u32, clip_limit: f32) -> [u8; 256] {
    let clip = ((clip_limit * area as f32 / 256.0) as u32).max(1);

    let mut excess = 0u32;
    for count in histogram.iter_mut() {
        if *count > clip {
            excess += *count - clip;
            *count = clip;
        }
    }
    // Uniform redistribution; the remainder goes to the low bins so the
    // result stays exactly area-preserving and deterministic.
    let bonus = excess / 256;
    let remainder = (excess % 256) as usize;
    for (i, count) in histogram.iter_mut().enumerate() {
        *count += bonus + u32::from(i < remainder);
    }

    let mut lut = [0u8; 256];
    let mut cumulative = 0u32;
    for (value, count) in histogram.iter().enumerate() {
        cumulative += count;
        lut[value] = ((cumulative as f32 * 255.0 / area as f32).round()).min(255.0) as u8;
    }
    lut
}

/// Bilinear blend between the four tile LUTs surrounding a pixel.
fn blend_luts(
    luts: &[[u8; 256]],
    cols: usize,
    rows: usize,
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    value: usize,
) -> u8 {
    let fx = ((x as f32 + 0.5) * cols as f32 / width as f32 - 0.5).max(0.0);
    let fy = ((y as f32 + 0.5) * rows as f32 / height as f32 - 0.5).max(0.0);

    let tx0 = (fx as usize).min(cols - 1);
    let ty0 = (fy as usize).min(rows - 1);
    let tx1 = (tx0 + 1).min(cols - 1);
    let ty1 = (ty0 + 1).min(rows - 1);
    let wx = (fx - tx0 as f32).clamp(0.0, 1.0);
    let wy = (fy - ty0 as f32).clamp(0.0, 1.0);

    let top = luts[ty0 * cols + tx0][value] as f32 * (1.0 - wx)
        + luts[ty0 * cols + tx1][value] as f32 * wx;
    let bottom = luts[ty1 * cols + tx0][value] as f32 * (1.0 - wx)
        + luts[ty1 * cols + tx1][value] as f32 * wx;
    (top * (1.0 - wy) + bottom * wy).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn std_dev(values: &[f32]) -> f32 {
        let mean = values.iter().sum::<f32>() / values.len() as f32;
        let variance =
            values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / values.len() as f32;
        variance.sqrt()
    }

    fn low_contrast_gradient(width: u32, height: u32) -> RasterImage {
        // Luminance confined to a narrow band; equalization has plenty
        // of headroom to stretch.
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((100 + (x + y) * 40 / (width + height)) as u8);
            }
        }
        RasterImage::new(width, height, ChannelLayout::Gray, data).unwrap()
    }

    #[test]
    fn output_is_single_channel_with_input_dimensions() {
        let source = low_contrast_gradient(32, 24);
        let map = DisplacementMapSynthesizer::default()
            .synthesize(&source)
            .unwrap();
        assert_eq!(map.layout(), ChannelLayout::Gray);
        assert_eq!((map.width(), map.height()), (32, 24));
    }

    #[test]
    fn contrast_strictly_increases_on_woven_texture() {
        // Low-amplitude weave: luminance alternates inside a narrow band,
        // the case the equalization exists to amplify.
        let mut data = Vec::with_capacity(256 * 256);
        for y in 0..256u32 {
            for x in 0..256u32 {
                data.push(if (x + y) % 2 == 0 { 120 } else { 126 });
            }
        }
        let source = RasterImage::new(256, 256, ChannelLayout::Gray, data).unwrap();
        let map = DisplacementMapSynthesizer::default()
            .synthesize(&source)
            .unwrap();

        let before = std_dev(&source.luminance());
        let after = std_dev(&map.luminance());
        assert!(
            after > before,
            "expected equalization to raise std-dev, before {before} after {after}"
        );
    }

    #[test]
    fn uniform_input_stays_well_defined() {
        let flat = RasterImage::new(16, 16, ChannelLayout::Gray, vec![200; 256]).unwrap();
        let map = DisplacementMapSynthesizer::default().synthesize(&flat).unwrap();
        let first = map.data()[0];
        assert!(map.data().iter().all(|&v| v == first));
    }

    #[test]
    fn degenerate_geometry_is_reported() {
        let tiny = RasterImage::new(1, 1, ChannelLayout::Rgb, vec![1, 2, 3]).unwrap();
        let err = DisplacementMapSynthesizer::default()
            .synthesize(&tiny)
            .unwrap_err();
        assert!(matches!(err, TextureError::DegenerateImage { .. }));
    }

    #[test]
    fn synthesis_is_deterministic() {
        let source = low_contrast_gradient(40, 40);
        let synth = DisplacementMapSynthesizer::default();
        assert_eq!(
            synth.synthesize(&source).unwrap(),
            synth.synthesize(&source).unwrap()
        );
    }
}
