use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::StorefrontRepository;
use crate::{
    audit::AuditEntry,
    dto::orders::{CreateOrderRequest, OrderDocument},
    error::{AppError, AppResult},
    models::User,
};

/// Process-local storage for tests and database-less runs.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    users: RwLock<HashMap<String, User>>,
    orders: RwLock<Vec<OrderDocument>>,
    audit: RwLock<Vec<AuditEntry>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit.read().await.clone()
    }

    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl StorefrontRepository for InMemoryRepository {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }

    async fn insert_user(&self, email: &str, password_hash: &str) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(AppError::BadRequest("Email is already taken".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn list_orders(&self) -> AppResult<Vec<OrderDocument>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().rev().cloned().collect())
    }

    async fn insert_order(&self, order: CreateOrderRequest) -> AppResult<OrderDocument> {
        let doc = OrderDocument::from_request(order, Utc::now());
        self.orders.write().await.push(doc.clone());
        Ok(doc)
    }

    async fn delete_order(&self, order_id: i64) -> AppResult<u64> {
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|doc| doc.order_id != order_id);
        Ok((before - orders.len()) as u64)
    }

    async fn record_audit(&self, entry: AuditEntry) -> AppResult<()> {
        self.audit.write().await.push(entry);
        Ok(())
    }
}
