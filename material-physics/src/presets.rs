/// Static physics preset library for fabric rendering.
use serde::{Serialize, Serializer};

/// Physically-based material coefficients consumed by the cloth renderer.
/// Serializes as a flat property bag for attachment to product records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicsPreset {
    /// Display name of the material.
    pub name: &'static str,
    /// Surface roughness in [0, 1].
    pub roughness: f32,
    /// Metalness in [0, 1]; near zero for all fabrics.
    pub metalness: f32,
    /// Optional clearcoat layer strength in [0, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearcoat: Option<f32>,
    /// Relative cloth thickness, always positive.
    pub thickness: f32,
    /// Base albedo tint, serialized as a #rrggbb hex string.
    #[serde(rename = "color", serialize_with = "serialize_hex_color")]
    pub base_color: [u8; 3],
    /// How much the cloth stretches under tension, in [0, 1].
    #[serde(rename = "stretchFactor")]
    pub stretch_factor: f32,
    /// How readily the cloth drapes and folds, in [0, 1].
    #[serde(rename = "drapingFactor")]
    pub draping_factor: f32,
    /// Resistance to bending, in [0, 1].
    pub stiffness: f32,
}

fn serialize_hex_color<S: Serializer>(rgb: &[u8; 3], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]))
}

/// Library entry pairing a canonical key with its preset.
pub struct PresetEntry {
    pub key: &'static str,
    pub preset: PhysicsPreset,
}

/// Process-wide preset library, read-only after initialization.
/// Keys are the canonical material names the renderer understands.
pub const PRESET_LIBRARY: &[PresetEntry] = &[
    PresetEntry {
        key: "cotton",
        preset: PhysicsPreset {
            name: "Cotton",
            roughness: 0.8,
            metalness: 0.0,
            clearcoat: None,
            thickness: 1.0,
            base_color: [0xff, 0xff, 0xff],
            stretch_factor: 0.3,
            draping_factor: 0.4,
            stiffness: 0.5,
        },
    },
    PresetEntry {
        key: "silk",
        preset: PhysicsPreset {
            name: "Silk",
            roughness: 0.2,
            metalness: 0.1,
            clearcoat: Some(0.5),
            thickness: 0.2,
            base_color: [0xf0, 0xf0, 0xf0],
            stretch_factor: 0.1,
            draping_factor: 0.9,
            stiffness: 0.1,
        },
    },
    PresetEntry {
        key: "denim",
        preset: PhysicsPreset {
            name: "Denim",
            roughness: 0.9,
            metalness: 0.0,
            clearcoat: None,
            thickness: 1.5,
            base_color: [0x3b, 0x59, 0x98],
            stretch_factor: 0.1,
            draping_factor: 0.2,
            stiffness: 0.8,
        },
    },
    PresetEntry {
        key: "leather",
        preset: PhysicsPreset {
            name: "Leather",
            roughness: 0.3,
            metalness: 0.2,
            clearcoat: None,
            thickness: 2.0,
            base_color: [0x3d, 0x2b, 0x1f],
            stretch_factor: 0.05,
            draping_factor: 0.3,
            stiffness: 0.9,
        },
    },
    PresetEntry {
        key: "knit",
        preset: PhysicsPreset {
            name: "Knit",
            roughness: 0.85,
            metalness: 0.0,
            clearcoat: None,
            thickness: 2.5,
            base_color: [0xe0, 0xe0, 0xe0],
            stretch_factor: 0.6,
            draping_factor: 0.6,
            stiffness: 0.4,
        },
    },
    PresetEntry {
        key: "linen",
        preset: PhysicsPreset {
            name: "Linen",
            roughness: 0.7,
            metalness: 0.0,
            clearcoat: None,
            thickness: 0.8,
            base_color: [0xfa, 0xf0, 0xe6],
            stretch_factor: 0.1,
            draping_factor: 0.5,
            stiffness: 0.6,
        },
    },
    PresetEntry {
        key: "polyester",
        preset: PhysicsPreset {
            name: "Polyester",
            roughness: 0.4,
            metalness: 0.1,
            clearcoat: None,
            thickness: 0.5,
            base_color: [0xf5, 0xf5, 0xf5],
            stretch_factor: 0.4,
            draping_factor: 0.7,
            stiffness: 0.3,
        },
    },
];

/// Keyword family grouping the phrases that select one preset key.
pub struct KeywordFamily {
    pub key: &'static str,
    pub keywords: &'static [&'static str],
}

/// Keyword families in fixed declaration order. Resolution scans this
/// table top to bottom and the first match wins, so the ordering is
/// load-bearing and must not be rearranged.
pub const KEYWORD_FAMILIES: &[KeywordFamily] = &[
    KeywordFamily {
        key: "cotton",
        keywords: &["cotton", "linen", "canvas", "hemp"],
    },
    KeywordFamily {
        key: "wool",
        keywords: &["wool", "cashmere", "mohair", "alpaca", "knit"],
    },
    KeywordFamily {
        key: "silk",
        keywords: &["silk", "satin", "rayon", "viscose", "chiffon", "crepe"],
    },
    KeywordFamily {
        key: "denim",
        keywords: &["denim", "jeans"],
    },
    KeywordFamily {
        key: "leather",
        keywords: &["leather", "suede", "faux leather", "lambskin", "calfskin"],
    },
    KeywordFamily {
        key: "synthetic",
        keywords: &[
            "polyester",
            "nylon",
            "elastane",
            "spandex",
            "acrylic",
            "polyurethane",
            "polyamide",
        ],
    },
    KeywordFamily {
        key: "heavy",
        keywords: &["tweed", "velvet", "corduroy"],
    },
];

/// Alias table for family keys without a direct preset entry.
/// Wool-family fabrics share the knit preset; there is no dedicated
/// wool preset by design.
pub const FAMILY_ALIASES: &[(&str, &str)] = &[
    ("wool", "knit"),
    ("synthetic", "polyester"),
    ("heavy", "denim"),
];

/// Look up a preset by canonical key.
pub fn preset_for(key: &str) -> Option<&'static PhysicsPreset> {
    PRESET_LIBRARY
        .iter()
        .find(|entry| entry.key == key)
        .map(|entry| &entry.preset)
}

/// Map a family key to the canonical preset key, applying the alias
/// table when the family has no direct library entry.
pub fn canonical_key(family_key: &'static str) -> &'static str {
    if preset_for(family_key).is_some() {
        return family_key;
    }
    FAMILY_ALIASES
        .iter()
        .find(|(from, _)| *from == family_key)
        .map_or("cotton", |(_, to)| to)
}

/// Cotton preset, the fallback for anything the tables cannot place.
pub fn default_preset() -> PhysicsPreset {
    PRESET_LIBRARY[0].preset.clone()
}

/// Iterate the full keyword vocabulary across all families.
pub fn vocabulary() -> impl Iterator<Item = &'static str> {
    KEYWORD_FAMILIES
        .iter()
        .flat_map(|family| family.keywords.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_family_resolves_to_a_library_entry() {
        for family in KEYWORD_FAMILIES {
            let key = canonical_key(family.key);
            assert!(
                preset_for(key).is_some(),
                "family {} resolved to missing preset {}",
                family.key,
                key
            );
        }
    }

    #[test]
    fn aliases_map_to_documented_presets() {
        assert_eq!(canonical_key("wool"), "knit");
        assert_eq!(canonical_key("synthetic"), "polyester");
        assert_eq!(canonical_key("heavy"), "denim");
        assert_eq!(canonical_key("silk"), "silk");
    }

    #[test]
    fn preset_serializes_as_flat_property_bag() {
        let bag = serde_json::to_value(preset_for("denim").unwrap()).unwrap();
        assert_eq!(bag["name"], "Denim");
        assert_eq!(bag["color"], "#3b5998");
        let stretch = bag["stretchFactor"].as_f64().unwrap();
        assert!((stretch - 0.1).abs() < 1e-6);
        assert!(bag.get("clearcoat").is_none());
    }
}
