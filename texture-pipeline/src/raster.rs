/// Owned raster buffer shared by every pipeline stage.
use crate::constants::LUMA_WEIGHTS;
use crate::error::TextureError;
use image::{DynamicImage, GrayImage, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Channel layout of a raster buffer; the pipeline only ever handles
/// single-channel and 3-channel 8-bit images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Gray,
    Rgb,
}

impl ChannelLayout {
    pub fn count(self) -> u32 {
        match self {
            ChannelLayout::Gray => 1,
            ChannelLayout::Rgb => 3,
        }
    }
}

/// 8-bit pixel buffer with row-major `width x height x channels` layout.
/// Stages take it by reference and return fresh buffers; caller-owned
/// input is never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap a raw buffer, enforcing the length invariant. Zero-area
    /// buffers are rejected so every constructed image supports
    /// clamp-to-edge sampling.
    pub fn new(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        data: Vec<u8>,
    ) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize * layout.count() as usize;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(TextureError::InvalidBuffer {
                width,
                height,
                channels: layout.count(),
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Decode raw PNG/JPEG bytes. Unreadable bytes are a fatal
    /// request error.
    pub fn decode(bytes: &[u8]) -> Result<Self, TextureError> {
        let dynamic = image::load_from_memory(bytes).map_err(TextureError::Decode)?;
        Ok(Self::from_dynamic(&dynamic))
    }

    /// Convert a decoded image, collapsing grayscale variants to one
    /// channel and everything else (including alpha formats) to RGB.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_) => {
                let gray = image.to_luma8();
                Self {
                    width: gray.width(),
                    height: gray.height(),
                    layout: ChannelLayout::Gray,
                    data: gray.into_raw(),
                }
            }
            _ => {
                let rgb = image.to_rgb8();
                Self {
                    width: rgb.width(),
                    height: rgb.height(),
                    layout: ChannelLayout::Rgb,
                    data: rgb.into_raw(),
                }
            }
        }
    }

    /// View as a `DynamicImage` for resampling and encoding.
    pub fn to_dynamic(&self) -> Result<DynamicImage, TextureError> {
        let invalid = || TextureError::InvalidBuffer {
            width: self.width,
            height: self.height,
            channels: self.layout.count(),
            actual: self.data.len(),
        };
        match self.layout {
            ChannelLayout::Gray => GrayImage::from_raw(self.width, self.height, self.data.clone())
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(invalid),
            ChannelLayout::Rgb => RgbImage::from_raw(self.width, self.height, self.data.clone())
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(invalid),
        }
    }

    /// Encode to PNG bytes for the service envelope.
    pub fn encode_png(&self) -> Result<Vec<u8>, TextureError> {
        let mut bytes = Cursor::new(Vec::new());
        self.to_dynamic()?
            .write_to(&mut bytes, image::ImageOutputFormat::Png)
            .map_err(TextureError::Encode)?;
        Ok(bytes.into_inner())
    }

    /// Write to disk; the container format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<(), TextureError> {
        self.to_dynamic()?.save(path).map_err(TextureError::Encode)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn channels(&self) -> u32 {
        self.layout.count()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Channel value at (x, y); coordinates must be in bounds.
    pub fn get(&self, x: u32, y: u32, channel: u32) -> u8 {
        let idx = (y as usize * self.width as usize + x as usize) * self.channels() as usize
            + channel as usize;
        self.data[idx]
    }

    /// Channel value with clamp-to-edge semantics for out-of-range
    /// coordinates, used at convolution borders.
    pub fn sample_clamped(&self, x: i64, y: i64, channel: u32) -> u8 {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.get(cx, cy, channel)
    }

    /// Per-pixel luminance as f32. Grayscale input copies through; RGB
    /// uses Rec. 601 weights.
    pub fn luminance(&self) -> Vec<f32> {
        match self.layout {
            ChannelLayout::Gray => self.data.iter().map(|&v| v as f32).collect(),
            ChannelLayout::Rgb => self
                .data
                .chunks_exact(3)
                .map(|px| {
                    px[0] as f32 * LUMA_WEIGHTS[0]
                        + px[1] as f32 * LUMA_WEIGHTS[1]
                        + px[2] as f32 * LUMA_WEIGHTS[2]
                })
                .collect(),
        }
    }

    /// Luminance rounded back to 8 bits, used by the displacement stage.
    pub fn luminance_u8(&self) -> Vec<u8> {
        self.luminance()
            .into_iter()
            .map(|v| v.round().clamp(0.0, 255.0) as u8)
            .collect()
    }
}
