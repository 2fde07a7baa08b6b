/// JSON service envelope with base64 data-URI encoded maps.
use crate::error::TextureError;
use crate::pipeline::TextureSet;
use crate::raster::RasterImage;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;

/// Response shape for the network boundary. Maps are PNG data URIs; a
/// slot whose synthesis failed is omitted entirely rather than sent as
/// null, and a fatal decode failure sets `success = false` with only
/// the error populated.
#[derive(Debug, Clone, Serialize)]
pub struct TextureEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub albedo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TextureEnvelope {
    /// Build the success envelope from a texture set.
    pub fn from_textures(set: &TextureSet) -> Result<Self, TextureError> {
        Ok(Self {
            success: true,
            albedo: Some(data_uri(&set.albedo)?),
            normal: set.normal.as_ref().map(data_uri).transpose()?,
            displacement: set.displacement.as_ref().map(data_uri).transpose()?,
            error: None,
        })
    }

    /// Build the failure envelope for a fatal request error.
    pub fn from_error(err: &TextureError) -> Self {
        Self {
            success: false,
            albedo: None,
            normal: None,
            displacement: None,
            error: Some(err.to_string()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn data_uri(image: &RasterImage) -> Result<String, TextureError> {
    let png = image.encode_png()?;
    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(&png)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ChannelLayout;

    fn tiny_set() -> TextureSet {
        let albedo = RasterImage::new(2, 2, ChannelLayout::Rgb, vec![50; 12]).unwrap();
        let normal = RasterImage::new(2, 2, ChannelLayout::Rgb, vec![128; 12]).unwrap();
        let displacement = RasterImage::new(2, 2, ChannelLayout::Gray, vec![200; 4]).unwrap();
        TextureSet {
            albedo,
            normal: Some(normal),
            displacement: Some(displacement),
        }
    }

    #[test]
    fn success_envelope_carries_png_data_uris() {
        let envelope = TextureEnvelope::from_textures(&tiny_set()).unwrap();
        assert!(envelope.success);
        let uri = envelope.albedo.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        // The payload must decode back to the same pixels.
        let b64 = uri.trim_start_matches("data:image/png;base64,");
        let png = STANDARD.decode(b64).unwrap();
        let decoded = RasterImage::decode(&png).unwrap();
        assert_eq!(decoded.data(), &[50u8; 12][..]);
    }

    #[test]
    fn failed_map_slots_are_omitted_from_json() {
        let mut set = tiny_set();
        set.normal = None;
        let json = TextureEnvelope::from_textures(&set).unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("normal").is_none());
        assert!(value.get("displacement").is_some());
    }

    #[test]
    fn fatal_error_envelope_has_no_maps() {
        let err = RasterImage::decode(&[1, 2, 3]).unwrap_err();
        let envelope = TextureEnvelope::from_error(&err);
        assert!(!envelope.success);
        assert!(envelope.albedo.is_none());
        assert!(envelope.error.unwrap().contains("decode"));
    }
}
