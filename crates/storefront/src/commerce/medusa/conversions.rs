//! Medusa wire type conversion functions.

use medusa_storefront_core::{
    Cart, CartId, Image, LineItem, LineItemId, LineItemProduct, LineItemVariant, Product,
    ProductId, ProductPage, ProductVariant, Quantity, VariantId, VariantPrice,
};
use tracing::warn;

use super::types::{
    MedusaCart, MedusaImage, MedusaLineItem, MedusaProduct, MedusaVariant, ProductsResponse,
};

fn convert_images(images: Vec<MedusaImage>, thumbnail: Option<String>) -> Vec<Image> {
    let mut images: Vec<Image> = images.into_iter().map(|i| Image::new(i.url)).collect();

    // Fall back to the thumbnail when the backend omits the image list
    if images.is_empty()
        && let Some(url) = thumbnail
    {
        images.push(Image::new(url));
    }

    images
}

fn convert_variant(variant: MedusaVariant) -> ProductVariant {
    ProductVariant {
        id: VariantId::new(variant.id),
        title: variant.title.unwrap_or_default(),
        prices: variant
            .prices
            .into_iter()
            .map(|p| VariantPrice {
                amount: p.amount,
                currency_code: p.currency_code,
            })
            .collect(),
    }
}

pub fn convert_product(product: MedusaProduct) -> Product {
    Product {
        id: ProductId::new(product.id),
        handle: product.handle,
        title: product.title,
        description: product.description.unwrap_or_default(),
        images: convert_images(product.images, product.thumbnail),
        variants: product.variants.into_iter().map(convert_variant).collect(),
    }
}

pub fn convert_product_page(response: ProductsResponse) -> ProductPage {
    let products: Vec<Product> = response.products.into_iter().map(convert_product).collect();
    let count = response
        .count
        .unwrap_or_else(|| u64::try_from(products.len()).unwrap_or(u64::MAX));

    ProductPage { products, count }
}

fn convert_line_item(item: MedusaLineItem) -> Option<LineItem> {
    let Some(quantity) = Quantity::new(item.quantity) else {
        warn!(line_item_id = %item.id, "Dropping line item with zero quantity");
        return None;
    };

    let variant = match item.variant {
        Some(variant) => {
            let product = variant.product.map_or_else(
                || LineItemProduct {
                    title: item.title.clone(),
                    images: convert_images(Vec::new(), item.thumbnail.clone()),
                },
                |p| LineItemProduct {
                    title: p.title.unwrap_or_else(|| item.title.clone()),
                    images: convert_images(p.images, p.thumbnail.or_else(|| item.thumbnail.clone())),
                },
            );
            LineItemVariant {
                id: VariantId::new(variant.id),
                title: variant.title.unwrap_or_default(),
                product,
            }
        }
        None => LineItemVariant {
            id: VariantId::new(item.variant_id.unwrap_or_default()),
            title: String::new(),
            product: LineItemProduct {
                title: item.title.clone(),
                images: convert_images(Vec::new(), item.thumbnail),
            },
        },
    };

    Some(LineItem {
        id: LineItemId::new(item.id),
        title: item.title,
        quantity,
        unit_price: item.unit_price,
        variant,
    })
}

pub fn convert_cart(cart: MedusaCart) -> Cart {
    Cart {
        id: CartId::new(cart.id),
        items: cart.items.into_iter().filter_map(convert_line_item).collect(),
        subtotal: cart.subtotal.unwrap_or_default(),
        shipping_total: cart.shipping_total.unwrap_or_default(),
        tax_total: cart.tax_total.unwrap_or_default(),
        total: cart.total.unwrap_or_default(),
    }
}
