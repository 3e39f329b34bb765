//! Remote failures and the simulator fallback.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use medusa_storefront::cart::MemoryCartIdStorage;
use medusa_storefront::commerce::{
    CommerceError, CommerceGateway, MedusaClient, MockCommerce, Routed,
};
use medusa_storefront::config::MedusaConfig;
use medusa_storefront_core::{CartId, ProductId, Quantity, VariantId};
use medusa_storefront_integration_tests::{TestContext, UnreachableBackend};

fn down_gateway() -> (CommerceGateway, Arc<UnreachableBackend>) {
    let remote = Arc::new(UnreachableBackend::new());
    let gateway = CommerceGateway::with_fallback(remote.clone(), MockCommerce::without_latency());
    (gateway, remote)
}

// =============================================================================
// Gateway
// =============================================================================

#[tokio::test]
async fn test_catalog_falls_back_with_cause() {
    let (gateway, remote) = down_gateway();

    let routed = gateway.list_products(12, 0).await.unwrap();

    let Routed::Fallback { value, cause } = routed else {
        panic!("expected a fallback result");
    };
    assert_eq!(value.products.len(), 8);
    assert_eq!(value.count, 8);
    assert!(matches!(cause, CommerceError::Api { status: 502, .. }));
    assert_eq!(remote.calls(), 1);
}

#[tokio::test]
async fn test_error_only_when_simulator_also_fails() {
    let (gateway, _) = down_gateway();

    let err = gateway
        .get_product(&ProductId::new("does-not-exist"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.primary_cause.is_some());
}

#[tokio::test]
async fn test_remote_cart_id_keeps_working_in_fallback() {
    let (gateway, _) = down_gateway();
    let remote_id = CartId::new("cart_01HREMOTE");

    let cart = gateway
        .add_line_item(&remote_id, &VariantId::new("var_6"), Quantity::ONE)
        .await
        .unwrap()
        .into_inner();

    assert_eq!(cart.id, remote_id);
    assert_eq!(cart.total, 27_900);
}

#[tokio::test]
async fn test_unreachable_medusa_host_falls_back() {
    let config = MedusaConfig {
        max_retries: 0,
        timeout: Duration::from_secs(2),
        ..MedusaConfig::default()
    };
    let client = MedusaClient::new(url::Url::parse("http://127.0.0.1:9/").unwrap(), &config).unwrap();
    let gateway = CommerceGateway::with_fallback(Arc::new(client), MockCommerce::without_latency());

    let routed = gateway.create_cart().await.unwrap();

    assert!(routed.is_fallback());
    assert!(routed.value().is_empty());
}

// =============================================================================
// Cart Store
// =============================================================================

#[tokio::test]
async fn test_fallback_cart_is_used_but_not_persisted() {
    let (gateway, _) = down_gateway();
    let ctx = TestContext::new(gateway, MemoryCartIdStorage::new());

    ctx.store.initialize().await;
    ctx.store.add_item(&VariantId::new("var_6"), Quantity::new(2).unwrap()).await;

    let state = ctx.store.snapshot();
    assert!(state.error.is_none());
    assert_eq!(state.cart.unwrap().subtotal, 55_800);
    assert!(ctx.storage.current().is_none());
}

#[tokio::test]
async fn test_fallback_does_not_overwrite_stored_id() {
    let (gateway, _) = down_gateway();
    let stored = CartId::new("cart_remote_1");
    let ctx = TestContext::new(gateway, MemoryCartIdStorage::with_id(stored.clone()));

    ctx.store.initialize().await;

    assert!(ctx.store.snapshot().cart.is_some());
    assert_eq!(ctx.storage.current(), Some(stored));
}

#[tokio::test]
async fn test_total_failure_surfaces_as_error_state() {
    let remote = Arc::new(UnreachableBackend::new());
    let ctx = TestContext::new(CommerceGateway::new(remote), MemoryCartIdStorage::new());

    ctx.store.initialize().await;

    let state = ctx.store.snapshot();
    assert!(state.cart.is_none());
    assert!(!state.loading);
    assert!(state.error.unwrap().contains("bad gateway"));
    assert_eq!(ctx.notifier.messages(), vec!["Could not create the cart"]);
}
