/// Request orchestration: bytes in, texture set and resolved physics out.
use crate::displacement::DisplacementMapSynthesizer;
use crate::error::TextureError;
use crate::normal_map::NormalMapSynthesizer;
use crate::raster::RasterImage;
use crate::upscaler::ImageUpscaler;
use log::warn;
use material_physics::{ResolvedMaterial, resolve};

/// The three maps produced for one garment image. All maps share the
/// albedo's dimensions; a `None` slot records a per-map synthesis
/// failure that did not abort the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSet {
    /// Upscaled, sharpened albedo. Always present on success.
    pub albedo: RasterImage,
    /// Tangent-space normal map (R=X, G=Y, B=Z), 3 channels.
    pub normal: Option<RasterImage>,
    /// Pseudo-height field, 1 channel.
    pub displacement: Option<RasterImage>,
}

/// One processed request: the texture set plus, when composition text
/// accompanied the image, the resolved physics preset.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub textures: TextureSet,
    pub material: Option<ResolvedMaterial>,
}

/// End-to-end texture pipeline. Stateless between requests; each call
/// works on its own buffers, so one instance may serve any number of
/// threads concurrently.
pub struct TexturePipeline {
    upscaler: ImageUpscaler,
    normal: NormalMapSynthesizer,
    displacement: DisplacementMapSynthesizer,
}

impl Default for TexturePipeline {
    fn default() -> Self {
        Self::new(ImageUpscaler::default())
    }
}

impl TexturePipeline {
    pub fn new(upscaler: ImageUpscaler) -> Self {
        Self {
            upscaler,
            normal: NormalMapSynthesizer::default(),
            displacement: DisplacementMapSynthesizer::default(),
        }
    }

    /// Convenience constructor from a raw scale factor (clamped to [1, 8]).
    pub fn with_scale(scale: f32) -> Self {
        Self::new(ImageUpscaler::new(scale))
    }

    /// Process one request. Decode failure is fatal and surfaces as the
    /// error; a synthesis failure on valid decoded input only empties
    /// that map's slot while the rest of the set is still returned.
    pub fn process(
        &self,
        bytes: &[u8],
        composition_text: Option<&str>,
    ) -> Result<PipelineOutput, TextureError> {
        let decoded = RasterImage::decode(bytes)?;
        let albedo = self.upscaler.upscale(&decoded)?;

        let normal = self.recover_map("normal", self.normal.synthesize(&albedo))?;
        let displacement =
            self.recover_map("displacement", self.displacement.synthesize(&albedo))?;

        Ok(PipelineOutput {
            textures: TextureSet {
                albedo,
                normal,
                displacement,
            },
            material: composition_text.map(resolve),
        })
    }

    /// Convert a recoverable per-map failure into an empty slot; anything
    /// fatal still propagates.
    fn recover_map(
        &self,
        map: &str,
        result: Result<RasterImage, TextureError>,
    ) -> Result<Option<RasterImage>, TextureError> {
        match result {
            Ok(image) => Ok(Some(image)),
            Err(err) if !err.is_fatal() => {
                warn!("{map} map synthesis failed, returning partial set: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ChannelLayout;

    fn encoded_gradient(width: u32, height: u32) -> Vec<u8> {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 13 + y * 7) % 256) as u8;
                data.extend_from_slice(&[v, 255 - v, 128]);
            }
        }
        RasterImage::new(width, height, ChannelLayout::Rgb, data)
            .unwrap()
            .encode_png()
            .unwrap()
    }

    #[test]
    fn full_request_produces_all_three_maps() {
        let output = TexturePipeline::with_scale(2.0)
            .process(&encoded_gradient(16, 12), Some("100% Silk"))
            .unwrap();

        let set = &output.textures;
        assert_eq!((set.albedo.width(), set.albedo.height()), (32, 24));

        let normal = set.normal.as_ref().unwrap();
        assert_eq!((normal.width(), normal.height()), (32, 24));
        assert_eq!(normal.channels(), 3);

        let displacement = set.displacement.as_ref().unwrap();
        assert_eq!((displacement.width(), displacement.height()), (32, 24));
        assert_eq!(displacement.channels(), 1);

        assert_eq!(output.material.unwrap().preset_key, "silk");
    }

    #[test]
    fn corrupt_bytes_fail_fatally() {
        let err = TexturePipeline::default()
            .process(b"definitely not an image", None)
            .unwrap_err();
        assert!(matches!(err, TextureError::Decode(_)));
    }

    #[test]
    fn truncated_png_fails_fatally() {
        let mut bytes = encoded_gradient(16, 16);
        bytes.truncate(bytes.len() / 3);
        let err = TexturePipeline::default().process(&bytes, None).unwrap_err();
        assert!(matches!(err, TextureError::Decode(_)));
    }

    #[test]
    fn degenerate_input_returns_partial_set() {
        // A 1x1 source at scale 1 keeps its size; both synthesis stages
        // then fail per-map while the albedo still comes back.
        let pixel = RasterImage::new(1, 1, ChannelLayout::Rgb, vec![9, 9, 9])
            .unwrap()
            .encode_png()
            .unwrap();
        let output = TexturePipeline::with_scale(1.0).process(&pixel, None).unwrap();
        assert_eq!(output.textures.albedo.pixel_count(), 1);
        assert!(output.textures.normal.is_none());
        assert!(output.textures.displacement.is_none());
    }

    #[test]
    fn requests_without_composition_skip_material_resolution() {
        let output = TexturePipeline::with_scale(1.0)
            .process(&encoded_gradient(4, 4), None)
            .unwrap();
        assert!(output.material.is_none());
    }

    #[test]
    fn repeated_requests_are_byte_identical() {
        let bytes = encoded_gradient(10, 10);
        let pipeline = TexturePipeline::with_scale(3.0);
        let a = pipeline.process(&bytes, None).unwrap();
        let b = pipeline.process(&bytes, None).unwrap();
        assert_eq!(a.textures, b.textures);
    }
}
