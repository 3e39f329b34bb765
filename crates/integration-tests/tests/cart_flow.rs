//! End-to-end cart sessions against the simulator.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use medusa_storefront::cart::{CartIdStorage, FileCartIdStorage, MemoryCartIdStorage};
use medusa_storefront_core::{LineItemId, Quantity, VariantId};
use medusa_storefront_integration_tests::{TestContext, mock_gateway};

fn qty(n: u32) -> Quantity {
    Quantity::new(n).unwrap()
}

// =============================================================================
// Session Lifecycle
// =============================================================================

#[tokio::test]
async fn test_first_session_creates_and_persists_cart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".storefront/cart_id");
    let ctx = TestContext::new(mock_gateway(), FileCartIdStorage::new(&path));

    ctx.store.initialize().await;

    let cart = ctx.store.snapshot().cart.unwrap();
    assert!(cart.id.as_str().starts_with("cart_"));
    assert_eq!(ctx.storage.load().unwrap(), Some(cart.id.clone()));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap().trim(),
        cart.id.as_str()
    );
}

#[tokio::test]
async fn test_second_session_restores_cart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart_id");
    let gateway = mock_gateway();

    let first = TestContext::new(gateway.clone(), FileCartIdStorage::new(&path));
    first.store.initialize().await;
    first.store.add_item(&VariantId::new("var_3"), qty(1)).await;
    let id = first.store.snapshot().cart.unwrap().id;

    let second = TestContext::new(gateway, FileCartIdStorage::new(&path));
    second.store.initialize().await;

    let cart = second.store.snapshot().cart.unwrap();
    assert_eq!(cart.id, id);
    assert_eq!(cart.items[0].variant.id.as_str(), "var_3");
}

#[tokio::test]
async fn test_garbage_in_storage_starts_new_cart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart_id");
    std::fs::write(&path, "not a cart id").unwrap();
    let ctx = TestContext::new(mock_gateway(), FileCartIdStorage::new(&path));

    ctx.store.initialize().await;

    let cart = ctx.store.snapshot().cart.unwrap();
    assert!(ctx.store.snapshot().error.is_none());
    assert_eq!(ctx.storage.load().unwrap(), Some(cart.id));
}

#[tokio::test]
async fn test_clear_removes_stored_id_and_next_session_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart_id");
    let gateway = mock_gateway();

    let ctx = TestContext::new(gateway.clone(), FileCartIdStorage::new(&path));
    ctx.store.initialize().await;
    let old = ctx.store.snapshot().cart.unwrap().id;

    ctx.store.clear().await;
    ctx.store.clear().await;

    assert!(ctx.store.snapshot().cart.is_none());
    assert!(!path.exists());
    assert_eq!(ctx.notifier.messages(), vec!["Cart cleared", "Cart cleared"]);

    let next = TestContext::new(gateway, FileCartIdStorage::new(&path));
    next.store.initialize().await;
    assert_ne!(next.store.snapshot().cart.unwrap().id, old);
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn test_add_to_empty_cart_scenario() {
    let ctx = TestContext::new(mock_gateway(), MemoryCartIdStorage::new());
    ctx.store.initialize().await;

    ctx.store.add_item(&VariantId::new("var_6"), qty(2)).await;

    let state = ctx.store.snapshot();
    let cart = state.cart.as_ref().unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity.get(), 2);
    assert_eq!(cart.items[0].unit_price, 27_900);
    assert_eq!(cart.subtotal, 55_800);
    assert_eq!(cart.total, 55_800);
    assert_eq!(state.item_count(), 2);
    assert_eq!(ctx.store.total().to_string(), "558.00");
}

#[tokio::test]
async fn test_item_count_tracks_sum_of_adds() {
    let ctx = TestContext::new(mock_gateway(), MemoryCartIdStorage::new());
    ctx.store.initialize().await;

    let adds = [("var_1", 1), ("var_6", 2), ("var_1", 3), ("var_13", 1), ("var_6", 4)];
    let mut expected = 0;
    for (variant, n) in adds {
        ctx.store.add_item(&VariantId::new(variant), qty(n)).await;
        expected += u64::from(n);

        let state = ctx.store.snapshot();
        let cart = state.cart.as_ref().unwrap();
        let sum: u64 = cart.items.iter().map(|i| u64::from(i.quantity.get())).sum();
        assert_eq!(state.item_count(), expected);
        assert_eq!(sum, expected);
    }

    assert_eq!(ctx.store.snapshot().cart.unwrap().items.len(), 3);
}

#[tokio::test]
async fn test_quantity_edits_and_removal() {
    let ctx = TestContext::new(mock_gateway(), MemoryCartIdStorage::new());
    ctx.store.initialize().await;
    ctx.store.add_item(&VariantId::new("var_9"), qty(1)).await;
    ctx.store.add_item(&VariantId::new("var_10"), qty(1)).await;
    let lines: Vec<LineItemId> = ctx
        .store
        .snapshot()
        .cart
        .unwrap()
        .items
        .into_iter()
        .map(|i| i.id)
        .collect();

    ctx.store.update_item_quantity(&lines[0], qty(4)).await;
    ctx.store.set_item_quantity(&lines[1], 0).await;

    let cart = ctx.store.snapshot().cart.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity.get(), 4);
    assert_eq!(cart.total, 4 * 39_900);
    assert_eq!(
        ctx.notifier.messages(),
        vec![
            "Product added to cart",
            "Product added to cart",
            "Quantity updated",
            "Product removed"
        ]
    );
}

#[tokio::test]
async fn test_failures_keep_snapshot_and_notify() {
    let ctx = TestContext::new(mock_gateway(), MemoryCartIdStorage::new());
    ctx.store.initialize().await;
    ctx.store.add_item(&VariantId::new("var_1"), qty(1)).await;
    let before = ctx.store.snapshot().cart.unwrap();

    ctx.store.add_item(&VariantId::new("var_999"), qty(1)).await;
    ctx.store
        .update_item_quantity(&LineItemId::new("item_missing"), qty(2))
        .await;

    let state = ctx.store.snapshot();
    assert_eq!(state.cart.unwrap(), before);
    assert!(!state.loading);
    assert!(state.error.unwrap().contains("item_missing"));
    assert_eq!(
        ctx.notifier.messages(),
        vec![
            "Product added to cart",
            "Could not add the product",
            "Could not update the quantity"
        ]
    );
}

#[tokio::test]
async fn test_success_clears_previous_error() {
    let ctx = TestContext::new(mock_gateway(), MemoryCartIdStorage::new());
    ctx.store.initialize().await;

    ctx.store.add_item(&VariantId::new("var_999"), qty(1)).await;
    assert!(ctx.store.snapshot().error.is_some());

    ctx.store.add_item(&VariantId::new("var_2"), qty(1)).await;
    assert!(ctx.store.snapshot().error.is_none());
}
