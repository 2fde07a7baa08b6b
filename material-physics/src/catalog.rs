/// Brand catalog adapters with deterministic mock product generation.
use crate::parser::MaterialComposition;
use crate::presets::PhysicsPreset;
use crate::resolver::resolve;
use rand::Rng;
use serde::Serialize;

/// Storefront brands the catalog knows how to address.
///
/// Live product extraction is deliberately not part of this surface:
/// `category_url` says where an extractor would start and
/// `mock_products` stands in for its output, carrying the same record
/// shape a live scrape would produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brand {
    Hm,
    Zara,
    Uniqlo,
    Cos,
    Gap,
    Gucci,
}

/// Normalized product category used across all brands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Tops,
    Dresses,
    Outerwear,
    Bottoms,
    Accessories,
}

impl Category {
    /// Map a free-form category string ("women-tops", "coats") to the
    /// normalized form; unknown strings land in Tops.
    pub fn from_label(category: &str) -> Self {
        let lowered = category.to_lowercase();
        if lowered.contains("dress") {
            Category::Dresses
        } else if lowered.contains("outerwear")
            || lowered.contains("coat")
            || lowered.contains("jacket")
        {
            Category::Outerwear
        } else if lowered.contains("bottom")
            || lowered.contains("pant")
            || lowered.contains("trouser")
        {
            Category::Bottoms
        } else if lowered.contains("bag") || lowered.contains("accessory") || lowered.contains("hat")
        {
            Category::Accessories
        } else {
            Category::Tops
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Dresses => "dresses",
            Category::Outerwear => "outerwear",
            Category::Bottoms => "bottoms",
            Category::Accessories => "accessories",
        }
    }
}

/// One scraped-or-mocked garment record, shaped for the upstream store.
/// The physics preset rides along under the `physics` key as a flat bag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub brand: &'static str,
    pub category: &'static str,
    pub price: f64,
    pub currency: &'static str,
    pub image_url: String,
    pub product_url: String,
    pub sizes: Vec<&'static str>,
    pub colors: Vec<&'static str>,
    pub material: String,
    pub composition: MaterialComposition,
    /// Canonical preset key; stays snake_case in JSON unlike the rest of
    /// the record, matching what the store consumer expects.
    #[serde(rename = "texture_type")]
    pub texture_type: &'static str,
    pub physics: PhysicsPreset,
    pub is_luxury: bool,
}

/// Mock garment names with the material line a product page would carry.
struct MockGarment {
    name: &'static str,
    material: &'static str,
}

const MOCK_TOPS: &[MockGarment] = &[
    MockGarment { name: "Oversized Cotton Shirt", material: "100% Cotton" },
    MockGarment { name: "Ribbed Tank Top", material: "95% Cotton, 5% Elastane" },
    MockGarment { name: "Linen Blend Blouse", material: "55% Linen, 45% Viscose" },
    MockGarment { name: "Jersey Top", material: "60% Polyester, 40% Cotton" },
    MockGarment { name: "Cropped Hoodie", material: "80% Cotton, 20% Polyester" },
];

const MOCK_DRESSES: &[MockGarment] = &[
    MockGarment { name: "Ribbed Knit Dress", material: "70% Wool, 30% Nylon" },
    MockGarment { name: "Satin Slip Dress", material: "100% Polyester Satin" },
    MockGarment { name: "Puff-sleeved Dress", material: "100% Cotton" },
    MockGarment { name: "Shirt Dress", material: "100% Viscose" },
    MockGarment { name: "Wrap Dress", material: "95% Silk, 5% Elastane" },
];

const MOCK_OUTERWEAR: &[MockGarment] = &[
    MockGarment { name: "Single-breasted Jacket", material: "Tweed, 100% Wool" },
    MockGarment { name: "Denim Jacket", material: "100% Cotton Denim" },
    MockGarment { name: "Trench Coat", material: "65% Polyester, 35% Cotton" },
    MockGarment { name: "Puffer Vest", material: "100% Nylon" },
    MockGarment { name: "Wool Blend Coat", material: "60% Wool, 40% Polyester" },
];

const MOCK_BOTTOMS: &[MockGarment] = &[
    MockGarment { name: "Wide High Jeans", material: "99% Cotton, 1% Elastane" },
    MockGarment { name: "Linen Trousers", material: "100% Linen" },
    MockGarment { name: "Cargo Pants", material: "100% Cotton Canvas" },
    MockGarment { name: "Sweatpants", material: "80% Cotton, 20% Polyester" },
    MockGarment { name: "A-line Skirt", material: "100% Polyester" },
];

const MOCK_LUXURY_TOPS: &[MockGarment] = &[
    MockGarment { name: "Jacquard Silk Blouse", material: "100% Silk" },
    MockGarment { name: "Floral Print Crepe Top", material: "Crepe 100% Silk" },
    MockGarment { name: "Monogram Cashmere Sweater", material: "90% Cashmere, 10% Wool" },
    MockGarment { name: "Lace-trimmed Silk Shirt", material: "95% Silk, 5% Elastane" },
];

const MOCK_LUXURY_DRESSES: &[MockGarment] = &[
    MockGarment { name: "Floral Print Silk Dress", material: "100% Silk" },
    MockGarment { name: "Canvas Midi Dress", material: "100% Cotton Canvas" },
    MockGarment { name: "Horsebit Jersey Dress", material: "85% Viscose, 15% Elastane" },
    MockGarment { name: "Crystal Embroidery Gown", material: "Silk 70%, Polyamide 30%" },
];

const MOCK_LUXURY_OUTERWEAR: &[MockGarment] = &[
    MockGarment { name: "Wool Cashmere Coat", material: "80% Wool, 20% Cashmere" },
    MockGarment { name: "Tweed Jacket", material: "Tweed, 100% Wool" },
    MockGarment { name: "Leather Rider Jacket", material: "100% Lambskin Leather" },
    MockGarment { name: "Quilted Down Jacket", material: "100% Nylon" },
];

const MOCK_SIZES: &[&str] = &["XS", "S", "M", "L", "XL"];
const MOCK_LUXURY_SIZES: &[&str] = &["IT 36", "IT 38", "IT 40", "IT 42", "IT 44"];
const MOCK_COLORS: &[&str] = &["Black", "Beige", "Blue"];
const MOCK_LUXURY_COLORS: &[&str] = &["Black", "Ivory", "Multi"];

impl Brand {
    pub fn name(self) -> &'static str {
        match self {
            Brand::Hm => "HM",
            Brand::Zara => "Zara",
            Brand::Uniqlo => "Uniqlo",
            Brand::Cos => "COS",
            Brand::Gap => "Gap",
            Brand::Gucci => "Gucci",
        }
    }

    /// Whether the brand sells at luxury positioning; flows straight
    /// into the record's `isLuxury` flag.
    pub fn is_luxury(self) -> bool {
        matches!(self, Brand::Gucci)
    }

    fn domain(self) -> &'static str {
        match self {
            Brand::Hm => "https://www2.hm.com",
            Brand::Zara => "https://www.zara.com",
            Brand::Uniqlo => "https://www.uniqlo.com",
            Brand::Cos => "https://www.cos.com",
            Brand::Gap => "https://www.gap.com",
            Brand::Gucci => "https://www.gucci.com",
        }
    }

    /// Listing URL for a category, or None where the brand has no
    /// equivalent section. Accessories are not scraped anywhere.
    pub fn category_url(self, category: &str) -> Option<String> {
        let normalized = Category::from_label(category);
        let path = match (self, normalized) {
            (_, Category::Accessories) => return None,
            (Brand::Hm, Category::Tops) => "en_us/women/products/tops.html",
            (Brand::Hm, Category::Dresses) => "en_us/women/products/dresses.html",
            (Brand::Hm, Category::Outerwear) => "en_us/women/products/jackets-coats.html",
            (Brand::Hm, Category::Bottoms) => "en_us/women/products/pants.html",
            (Brand::Zara, Category::Tops) => "us/en/woman-shirts-l1217.html",
            (Brand::Zara, Category::Dresses) => "us/en/woman-dresses-l1066.html",
            (Brand::Zara, Category::Outerwear) => "us/en/woman-outerwear-l1184.html",
            (Brand::Zara, Category::Bottoms) => "us/en/woman-trousers-l1335.html",
            (Brand::Uniqlo, Category::Tops) => "us/en/women/tops",
            (Brand::Uniqlo, Category::Dresses) => "us/en/women/dresses-and-jumpsuits",
            (Brand::Uniqlo, Category::Outerwear) => "us/en/women/outerwear",
            (Brand::Uniqlo, Category::Bottoms) => "us/en/women/bottoms",
            (Brand::Cos, Category::Tops) => "en_usd/women/tops.html",
            (Brand::Cos, Category::Dresses) => "en_usd/women/dresses.html",
            (Brand::Cos, Category::Outerwear) => "en_usd/women/coats-and-jackets.html",
            (Brand::Cos, Category::Bottoms) => "en_usd/women/trousers.html",
            (Brand::Gap, Category::Tops) => "browse/women/shirts",
            (Brand::Gap, Category::Dresses) => "browse/women/dresses",
            (Brand::Gap, Category::Outerwear) => "browse/women/outerwear",
            (Brand::Gap, Category::Bottoms) => "browse/women/pants",
            (Brand::Gucci, Category::Tops) => "us/en/ca/women/ready-to-wear-c-women-readytowear",
            (Brand::Gucci, Category::Dresses) => {
                "us/en/ca/women/ready-to-wear/dresses-c-women-dresses"
            }
            (Brand::Gucci, Category::Outerwear) => {
                "us/en/ca/women/ready-to-wear/coats-jackets-c-women-coats-jackets"
            }
            // Gucci's storefront has no standalone bottoms listing.
            (Brand::Gucci, Category::Bottoms) => return None,
        };
        Some(format!("{}/{}", self.domain(), path))
    }

    /// Generate reproducible mock products for a category. The RNG is
    /// injected so tests can seed it; only pricing jitter consumes
    /// randomness.
    pub fn mock_products(
        self,
        category: &str,
        limit: usize,
        rng: &mut impl Rng,
    ) -> Vec<ProductRecord> {
        let normalized = Category::from_label(category);
        let garments = if self.is_luxury() {
            match normalized {
                Category::Dresses => MOCK_LUXURY_DRESSES,
                Category::Outerwear => MOCK_LUXURY_OUTERWEAR,
                _ => MOCK_LUXURY_TOPS,
            }
        } else {
            match normalized {
                Category::Dresses => MOCK_DRESSES,
                Category::Outerwear => MOCK_OUTERWEAR,
                Category::Bottoms => MOCK_BOTTOMS,
                Category::Tops | Category::Accessories => MOCK_TOPS,
            }
        };
        let (base_price, price_step, jitter) = if self.is_luxury() {
            (1500.0, 300.0, 100.0)
        } else {
            (24.99, 5.0, 4.0)
        };

        (0..limit)
            .map(|i| {
                let garment = &garments[i % garments.len()];
                let resolved = resolve(garment.material);
                let price = base_price + (i as f64) * price_step + rng.gen_range(0.0..jitter);
                ProductRecord {
                    id: format!("{}-{}-{}", self.name().to_lowercase(), category, i + 1),
                    name: garment.name.to_string(),
                    brand: self.name(),
                    category: normalized.slug(),
                    price: (price * 100.0).round() / 100.0,
                    currency: "USD",
                    image_url: format!(
                        "https://placehold.co/600x800?text={}+{}+{}",
                        self.name(),
                        normalized.slug(),
                        i + 1
                    ),
                    product_url: format!("{}/mock-{}", self.domain(), i + 1),
                    sizes: if self.is_luxury() { MOCK_LUXURY_SIZES } else { MOCK_SIZES }.to_vec(),
                    colors: if self.is_luxury() { MOCK_LUXURY_COLORS } else { MOCK_COLORS }
                        .to_vec(),
                    material: garment.material.to_string(),
                    composition: resolved.composition,
                    texture_type: resolved.preset_key,
                    physics: resolved.physics,
                    is_luxury: self.is_luxury(),
                }
            })
            .collect()
    }
}
