use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub image: String,
    pub description: String,
}

/// A product snapshot plus the quantity held in a cart or an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLineItem {
    pub id: i64,
    pub name: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            description: product.description.clone(),
            quantity,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentMethod {
    #[serde(rename = "card")]
    Card,
    #[serde(rename = "cod")]
    CashOnDelivery,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentStatus {
    #[default]
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub method: PaymentMethod,
    pub card_number: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
}

/// A finalized checkout. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    #[serde(alias = "orderId")]
    pub id: i64,
    pub date: String,
    pub customer: Customer,
    pub items: Vec<CartLineItem>,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub payment: Payment,
}

impl Order {
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }
}
