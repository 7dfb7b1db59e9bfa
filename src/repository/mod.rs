//! Storage behind the REST service.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    audit::AuditEntry,
    dto::orders::{CreateOrderRequest, OrderDocument},
    error::AppResult,
    models::User,
};

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

#[async_trait]
pub trait StorefrontRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn insert_user(&self, email: &str, password_hash: &str) -> AppResult<User>;

    /// All orders, newest-first by creation time.
    async fn list_orders(&self) -> AppResult<Vec<OrderDocument>>;

    async fn insert_order(&self, order: CreateOrderRequest) -> AppResult<OrderDocument>;

    /// Deletes every order with `order_id` and returns how many went away.
    async fn delete_order(&self, order_id: i64) -> AppResult<u64>;

    async fn record_audit(&self, entry: AuditEntry) -> AppResult<()>;
}
