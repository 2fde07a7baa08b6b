/// Error taxonomy for the texture synthesis pipeline.
use thiserror::Error;

/// Failures a texture request can hit. `Decode` is fatal to the request;
/// `DegenerateImage` is recovered per map by the pipeline; the rest
/// surface from the envelope and CLI layers.
#[derive(Debug, Error)]
pub enum TextureError {
    /// Input bytes were not a readable PNG/JPEG image.
    #[error("failed to decode image bytes: {0}")]
    Decode(image::ImageError),

    /// A synthesis stage was handed geometry it cannot work with.
    #[error("{stage} requires at least 2x2 pixels, got {width}x{height}")]
    DegenerateImage {
        stage: &'static str,
        width: u32,
        height: u32,
    },

    /// A result image failed to encode for output.
    #[error("failed to encode result image: {0}")]
    Encode(image::ImageError),

    /// Pixel buffer does not match the declared dimensions.
    #[error("buffer length {actual} does not match {width}x{height}x{channels}")]
    InvalidBuffer {
        width: u32,
        height: u32,
        channels: u32,
        actual: usize,
    },
}

impl TextureError {
    /// True for failures that abort a whole request rather than a
    /// single map slot.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TextureError::DegenerateImage { .. })
    }
}
