//! The fixed mock catalog.
//!
//! Eight products, sixteen variants. Prices are EUR cents.

use medusa_storefront_core::{Image, Product, ProductId, ProductVariant, VariantId, VariantPrice};

struct VariantSeed {
    id: &'static str,
    title: &'static str,
    amount: i64,
}

struct ProductSeed {
    id: &'static str,
    handle: &'static str,
    title: &'static str,
    description: &'static str,
    images: &'static [&'static str],
    variants: &'static [VariantSeed],
}

const CATALOG: &[ProductSeed] = &[
    ProductSeed {
        id: "prod_1",
        handle: "iphone-15-pro",
        title: "iPhone 15 Pro",
        description: "The most advanced iPhone, with the A17 Pro chip, a 48MP camera and a titanium design. Available in several colors and capacities.",
        images: &[
            "https://images.unsplash.com/photo-1592750475338-74b7b21085ab?w=400&h=400&fit=crop",
            "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?w=400&h=400&fit=crop",
        ],
        variants: &[
            VariantSeed { id: "var_1", title: "128GB - Natural Titanium", amount: 119_900 },
            VariantSeed { id: "var_2", title: "256GB - Natural Titanium", amount: 129_900 },
            VariantSeed { id: "var_3", title: "512GB - Natural Titanium", amount: 149_900 },
        ],
    },
    ProductSeed {
        id: "prod_2",
        handle: "macbook-air-m2",
        title: "MacBook Air M2",
        description: "Ultralight laptop with the M2 chip, a 13.6-inch Liquid Retina display and up to 18 hours of battery life.",
        images: &["https://images.unsplash.com/photo-1517336714731-489689fd1ca8?w=400&h=400&fit=crop"],
        variants: &[
            VariantSeed { id: "var_4", title: "8GB RAM - 256GB SSD", amount: 129_900 },
            VariantSeed { id: "var_5", title: "8GB RAM - 512GB SSD", amount: 149_900 },
        ],
    },
    ProductSeed {
        id: "prod_3",
        handle: "airpods-pro",
        title: "AirPods Pro",
        description: "Wireless earbuds with active noise cancellation, spatial audio and water resistance.",
        images: &["https://images.unsplash.com/photo-1606220945770-b5b6c2c55bf1?w=400&h=400&fit=crop"],
        variants: &[VariantSeed { id: "var_6", title: "Standard", amount: 27_900 }],
    },
    ProductSeed {
        id: "prod_4",
        handle: "ipad-air",
        title: "iPad Air",
        description: "Versatile tablet with the M1 chip, a 10.9-inch Liquid Retina display and Apple Pencil support.",
        images: &["https://images.unsplash.com/photo-1544244015-0df4b3ffc6b0?w=400&h=400&fit=crop"],
        variants: &[
            VariantSeed { id: "var_7", title: "64GB - WiFi", amount: 69_900 },
            VariantSeed { id: "var_8", title: "256GB - WiFi", amount: 89_900 },
        ],
    },
    ProductSeed {
        id: "prod_5",
        handle: "apple-watch-series-9",
        title: "Apple Watch Series 9",
        description: "Smartwatch with heart-rate monitoring, GPS and up to 18 hours of battery life. Available in several sizes.",
        images: &["https://images.unsplash.com/photo-1434493789847-2f02dc6ca359?w=400&h=400&fit=crop"],
        variants: &[
            VariantSeed { id: "var_9", title: "41mm - Aluminum", amount: 39_900 },
            VariantSeed { id: "var_10", title: "45mm - Aluminum", amount: 42_900 },
        ],
    },
    ProductSeed {
        id: "prod_6",
        handle: "imac-24",
        title: "iMac 24\"",
        description: "All-in-one with the M3 chip, a 4.5K Retina display and seven vibrant colors to choose from.",
        images: &["https://images.unsplash.com/photo-1527443224154-c4a3942d3acf?w=400&h=400&fit=crop"],
        variants: &[
            VariantSeed { id: "var_11", title: "8GB RAM - 256GB SSD", amount: 149_900 },
            VariantSeed { id: "var_12", title: "8GB RAM - 512GB SSD", amount: 169_900 },
        ],
    },
    ProductSeed {
        id: "prod_7",
        handle: "magic-keyboard",
        title: "Magic Keyboard",
        description: "Wireless keyboard with a minimalist design, scissor keys and up to a month of battery life.",
        images: &["https://images.unsplash.com/photo-1541140532154-b024d705b90a?w=400&h=400&fit=crop"],
        variants: &[
            VariantSeed { id: "var_13", title: "Spanish", amount: 9_900 },
            VariantSeed { id: "var_14", title: "English", amount: 9_900 },
        ],
    },
    ProductSeed {
        id: "prod_8",
        handle: "homepod-mini",
        title: "HomePod mini",
        description: "Smart speaker with Siri, 360-degree audio and smart home accessory control.",
        images: &["https://images.unsplash.com/photo-1545454675-3531b543be5d?w=400&h=400&fit=crop"],
        variants: &[
            VariantSeed { id: "var_15", title: "White", amount: 9_900 },
            VariantSeed { id: "var_16", title: "Space Gray", amount: 9_900 },
        ],
    },
];

/// Build the mock catalog.
pub fn products() -> Vec<Product> {
    CATALOG
        .iter()
        .map(|seed| Product {
            id: ProductId::new(seed.id),
            handle: Some(seed.handle.to_string()),
            title: seed.title.to_string(),
            description: seed.description.to_string(),
            images: seed.images.iter().map(|url| Image::new(*url)).collect(),
            variants: seed
                .variants
                .iter()
                .map(|v| ProductVariant {
                    id: VariantId::new(v.id),
                    title: v.title.to_string(),
                    prices: vec![VariantPrice {
                        amount: v.amount,
                        currency_code: Some("eur".to_string()),
                    }],
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_catalog_shape() {
        let products = products();
        assert_eq!(products.len(), 8);

        let variant_count: usize = products.iter().map(|p| p.variants.len()).sum();
        assert_eq!(variant_count, 16);
    }

    #[test]
    fn test_variant_ids_are_unique() {
        let products = products();
        let ids: HashSet<_> = products
            .iter()
            .flat_map(|p| p.variants.iter().map(|v| v.id.clone()))
            .collect();
        assert_eq!(ids.len(), 16);
    }

    #[test]
    fn test_every_product_has_an_image_and_a_price() {
        for product in products() {
            assert!(product.thumbnail().is_some(), "{} has no image", product.id);
            assert!(product.min_price().is_some(), "{} has no price", product.id);
        }
    }
}
