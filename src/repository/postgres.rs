use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use super::StorefrontRepository;
use crate::{
    audit::AuditEntry,
    dto::orders::{CreateOrderRequest, OrderDocument},
    entity::{
        audit_logs::ActiveModel as AuditActive,
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    models::User,
};

#[derive(Debug, Clone)]
pub struct PostgresRepository {
    orm: DatabaseConnection,
}

impl PostgresRepository {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl StorefrontRepository for PostgresRepository {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = Users::find()
            .filter(UserCol::Email.eq(email))
            .one(&self.orm)
            .await?;
        Ok(user.map(user_from_entity))
    }

    async fn insert_user(&self, email: &str, password_hash: &str) -> AppResult<User> {
        let user = UserActive {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: NotSet,
        }
        .insert(&self.orm)
        .await?;
        Ok(user_from_entity(user))
    }

    async fn list_orders(&self) -> AppResult<Vec<OrderDocument>> {
        Orders::find()
            .order_by_desc(OrderCol::CreatedAt)
            .order_by_desc(OrderCol::OrderId)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(order_from_entity)
            .collect()
    }

    async fn insert_order(&self, order: CreateOrderRequest) -> AppResult<OrderDocument> {
        let model = OrderActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.order_id),
            date: Set(order.date),
            customer: Set(to_json(&order.customer)?),
            items: Set(to_json(&order.items)?),
            total: Set(order.total),
            payment: Set(to_json(&order.payment)?),
            created_at: NotSet,
        }
        .insert(&self.orm)
        .await?;
        order_from_entity(model)
    }

    async fn delete_order(&self, order_id: i64) -> AppResult<u64> {
        let result = Orders::delete_many()
            .filter(OrderCol::OrderId.eq(order_id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected)
    }

    async fn record_audit(&self, entry: AuditEntry) -> AppResult<()> {
        AuditActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(entry.user_id),
            action: Set(entry.action),
            resource: Set(entry.resource),
            metadata: Set(entry.metadata),
            created_at: NotSet,
        }
        .insert(&self.orm)
        .await?;
        Ok(())
    }
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn order_from_entity(model: OrderModel) -> AppResult<OrderDocument> {
    Ok(OrderDocument {
        order_id: model.order_id,
        date: model.date,
        customer: from_json(model.customer)?,
        items: from_json(model.items)?,
        total: model.total,
        payment: from_json(model.payment)?,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn to_json<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.into()))
}

fn from_json<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| AppError::Internal(e.into()))
}
