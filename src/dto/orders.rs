use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CartLineItem, Customer, Order, Payment};

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(alias = "id")]
    pub order_id: i64,
    pub date: String,
    pub customer: Customer,
    pub items: Vec<CartLineItem>,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub payment: Payment,
}

impl From<&Order> for CreateOrderRequest {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            date: order.date.clone(),
            customer: order.customer.clone(),
            items: order.items.clone(),
            total: order.total,
            payment: order.payment.clone(),
        }
    }
}

/// An order as the remote service stores and returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
    pub order_id: i64,
    pub date: String,
    pub customer: Customer,
    pub items: Vec<CartLineItem>,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub payment: Payment,
    pub created_at: DateTime<Utc>,
}

impl OrderDocument {
    pub fn from_request(request: CreateOrderRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            order_id: request.order_id,
            date: request.date,
            customer: request.customer,
            items: request.items,
            total: request.total,
            payment: request.payment,
            created_at,
        }
    }
}

impl From<OrderDocument> for Order {
    fn from(doc: OrderDocument) -> Self {
        Self {
            id: doc.order_id,
            date: doc.date,
            customer: doc.customer,
            items: doc.items,
            total: doc.total,
            payment: doc.payment,
        }
    }
}
