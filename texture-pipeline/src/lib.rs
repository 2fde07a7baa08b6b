//! Garment photo to PBR texture set synthesis.
//!
//! Takes one low-resolution product photo and produces an upscaled
//! albedo, a tangent-space normal map and a displacement map, all with
//! closed-form filters. Every transform is a synchronous, CPU-bound pure
//! function over owned buffers; concurrency across requests needs no
//! coordination beyond giving each request its own buffers.

pub mod constants;
pub mod displacement;
pub mod envelope;
pub mod error;
pub mod normal_map;
pub mod pipeline;
pub mod raster;
pub mod upscaler;

pub use displacement::DisplacementMapSynthesizer;
pub use envelope::TextureEnvelope;
pub use error::TextureError;
pub use normal_map::NormalMapSynthesizer;
pub use pipeline::{PipelineOutput, TexturePipeline, TextureSet};
pub use raster::{ChannelLayout, RasterImage};
pub use upscaler::ImageUpscaler;
