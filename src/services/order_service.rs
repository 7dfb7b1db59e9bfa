use rust_decimal::Decimal;

use crate::{
    audit::log_audit,
    dto::orders::{CreateOrderRequest, OrderDocument},
    error::{AppError, AppResult},
    models::CartLineItem,
    repository::StorefrontRepository,
    response::SuccessFlag,
};

/// Orders newest-first.
pub async fn list_orders(repo: &dyn StorefrontRepository) -> AppResult<Vec<OrderDocument>> {
    repo.list_orders().await
}

/// Browser clients sum prices in floating point, so totals are compared at
/// cent precision and the recomputed total is what gets stored.
pub async fn create_order(
    repo: &dyn StorefrontRepository,
    mut payload: CreateOrderRequest,
) -> AppResult<OrderDocument> {
    payload.total = validate_order(&payload)?;

    let order = repo.insert_order(payload).await?;
    tracing::info!(order_id = order.order_id, total = %order.total, "order created");

    if let Err(err) = log_audit(
        repo,
        None,
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.order_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(order)
}

/// Removing an unknown order still succeeds.
pub async fn delete_order(repo: &dyn StorefrontRepository, order_id: i64) -> AppResult<SuccessFlag> {
    let removed = repo.delete_order(order_id).await?;
    tracing::info!(order_id, removed, "order delete");

    if removed > 0 {
        if let Err(err) = log_audit(
            repo,
            None,
            "order_delete",
            Some("orders"),
            Some(serde_json::json!({ "order_id": order_id })),
        )
        .await
        {
            tracing::warn!(error = %err, "audit log failed");
        }
    }

    Ok(SuccessFlag::ok())
}

fn validate_order(order: &CreateOrderRequest) -> AppResult<Decimal> {
    if order.items.is_empty() {
        return Err(AppError::BadRequest("order has no items".into()));
    }
    if order.items.iter().any(|item| item.quantity == 0) {
        return Err(AppError::BadRequest("Cart has invalid quantity".into()));
    }
    if order.items.iter().any(|item| item.price < Decimal::ZERO) {
        return Err(AppError::BadRequest("item price must not be negative".into()));
    }

    let expected: Decimal = order.items.iter().map(CartLineItem::subtotal).sum();
    if order.total.round_dp(2) != expected.round_dp(2) {
        return Err(AppError::BadRequest(format!(
            "total {} does not match line items {}",
            order.total, expected
        )));
    }
    Ok(expected)
}
