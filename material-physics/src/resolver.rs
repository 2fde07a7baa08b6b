/// Dominant-material resolution from composition text to physics presets.
use crate::parser::{MaterialComposition, parse_composition};
use crate::presets::{KEYWORD_FAMILIES, PhysicsPreset, canonical_key, preset_for};
use log::debug;
use serde::Serialize;

/// Outcome of resolving one composition string.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedMaterial {
    /// Raw phrase-to-percentage mapping extracted from the text.
    pub composition: MaterialComposition,
    /// Phrase (or pseudo-keyword) that drove the preset choice.
    pub dominant: String,
    /// Canonical preset key handed to the renderer.
    #[serde(rename = "texture_type")]
    pub preset_key: &'static str,
    /// Value copy of the library preset; callers own this freely.
    pub physics: PhysicsPreset,
}

/// Resolve free text to a physics preset.
///
/// The dominant entry of the parsed composition picks the preset; when the
/// parse comes up empty the raw text is scanned against the keyword
/// families directly and the first matching family supplies its first
/// keyword as a pseudo-dominant value. Unrecognized text falls back to
/// cotton rather than failing.
pub fn resolve(text: &str) -> ResolvedMaterial {
    let lowered = text.to_lowercase();
    let composition = parse_composition(text);

    let dominant = match composition.dominant() {
        Some((phrase, _)) => phrase.to_string(),
        None => fallback_keyword(&lowered).unwrap_or_default(),
    };

    let preset_key = preset_key_for(&dominant);
    debug!("resolved {:?} -> dominant {:?} -> preset {}", text, dominant, preset_key);

    ResolvedMaterial {
        composition,
        dominant,
        preset_key,
        physics: preset_for(preset_key)
            .cloned()
            .unwrap_or_else(crate::presets::default_preset),
    }
}

/// First keyword of the first family with any keyword present in the text.
fn fallback_keyword(lowered: &str) -> Option<String> {
    KEYWORD_FAMILIES
        .iter()
        .find(|family| family.keywords.iter().any(|k| lowered.contains(k)))
        .map(|family| family.keywords[0].to_string())
}

/// Map a dominant phrase to a canonical preset key by scanning the
/// keyword families in declaration order; first match wins.
fn preset_key_for(dominant: &str) -> &'static str {
    for family in KEYWORD_FAMILIES {
        if family.keywords.iter().any(|k| dominant.contains(k)) {
            return canonical_key(family.key);
        }
    }
    "cotton"
}
