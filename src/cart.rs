use chrono::{DateTime, Local};
use rust_decimal::Decimal;

use crate::{
    checkout::PaymentInfo,
    error::CheckoutError,
    models::{CartLineItem, Customer, Order, Payment, PaymentMethod, PaymentStatus, Product},
};

/// The in-progress cart. Holds at most one line item per product id.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartLineItem>,
    last_order_id: i64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from persisted line items, merging duplicate ids and
    /// dropping empty lines.
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
                None => cart.items.push(item),
            }
        }
        cart
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, product_id: i64) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.id == product_id)
            .map(|item| item.quantity)
    }

    /// Total number of units across all line items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartLineItem::new(product, 1)),
        }
    }

    pub fn update_quantity(&mut self, product_id: i64, delta: i64) {
        let Some(item) = self.items.iter_mut().find(|item| item.id == product_id) else {
            return;
        };

        let next = i64::from(item.quantity).saturating_add(delta);
        if next <= 0 {
            self.remove(product_id);
        } else {
            item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
    }

    pub fn remove(&mut self, product_id: i64) {
        self.items.retain(|item| item.id != product_id);
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    /// Turns the cart into an [`Order`] and empties it. On error the cart is
    /// left untouched.
    pub fn finalize_order(
        &mut self,
        customer: &Customer,
        payment: &PaymentInfo,
    ) -> Result<Order, CheckoutError> {
        self.finalize_order_at(customer, payment, Local::now())
    }

    pub fn finalize_order_at(
        &mut self,
        customer: &Customer,
        payment: &PaymentInfo,
        now: DateTime<Local>,
    ) -> Result<Order, CheckoutError> {
        if self.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        payment.validate()?;

        let id = now.timestamp_millis().max(self.last_order_id + 1);
        let card_number = match payment.method {
            PaymentMethod::Card => Some(mask_card_number(&payment.card_number)),
            PaymentMethod::CashOnDelivery => None,
        };

        let order = Order {
            id,
            date: now.format("%-m/%-d/%Y").to_string(),
            customer: customer.clone(),
            items: self.items.clone(),
            total: self.total(),
            payment: Payment {
                method: payment.method,
                card_number,
                status: PaymentStatus::Completed,
            },
        };

        self.items.clear();
        self.last_order_id = id;
        Ok(order)
    }
}

fn mask_card_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(|c| !c.is_whitespace()).collect();
    let last_four: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("**** **** **** {last_four}")
}
