//! Plain-text rendering of catalog and cart data.

#![allow(clippy::print_stdout)]

use medusa_storefront::cart::CartState;
use medusa_storefront_core::{CurrencyCode, Price, Product, ProductPage};

fn money(minor: i64, currency: CurrencyCode) -> String {
    Price::from_minor(minor, currency).display()
}

pub fn print_line(line: &str) {
    println!("{line}");
}

pub fn print_products(page: &ProductPage, offset: u32, currency: CurrencyCode) {
    for product in &page.products {
        let price = product
            .min_price()
            .map_or_else(|| "-".to_string(), |p| money(p, currency));
        println!("{:<12} {:<32} from {price}", product.id.as_str(), product.title);
    }
    println!(
        "Showing {} from offset {offset} of {} products",
        page.products.len(),
        page.count
    );
}

pub fn print_product(product: &Product, currency: CurrencyCode) {
    println!("{} ({})", product.title, product.id);
    if !product.description.is_empty() {
        println!("{}", product.description);
    }
    if let Some(image) = product.thumbnail() {
        println!("Image: {}", image.url);
    }
    println!();
    for variant in &product.variants {
        let price = variant
            .active_price()
            .map_or_else(|| "unavailable".to_string(), |p| money(p, currency));
        println!("  {:<10} {:<24} {price}", variant.id.as_str(), variant.title);
    }
}

pub fn print_cart(state: &CartState, currency: CurrencyCode) {
    let Some(cart) = &state.cart else {
        println!("No active cart");
        return;
    };

    println!("Cart {}", cart.id);
    if cart.is_empty() {
        println!("  (empty)");
    }
    for item in &cart.items {
        println!(
            "  {:<24} {:<32} {:>3} x {:>10} = {:>10}",
            item.id.as_str(),
            item.title,
            item.quantity.get(),
            money(item.unit_price, currency),
            money(item.line_total(), currency)
        );
    }
    println!();
    println!("Items:    {}", state.item_count());
    println!("Subtotal: {}", money(cart.subtotal, currency));
    println!("Shipping: {}", money(cart.shipping_total, currency));
    println!("Tax:      {}", money(cart.tax_total, currency));
    println!("Total:    {}", money(cart.total, currency));
}
