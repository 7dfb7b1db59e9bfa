//! Remote-first order persistence with a local fallback store.
//!
//! Every remote failure is recovered locally and logged; callers only see
//! which backend answered through [`StoreOutcome`]. The two stores are never
//! reconciled.
//!
//! Local records are handled as raw JSON so one record this build cannot
//! decode never blocks writes or hides the other orders.

pub mod remote;

use serde_json::Value;

use crate::{
    local_store::{LocalStore, ORDERS_KEY},
    models::Order,
};

pub use remote::{HttpStorefrontApi, StorefrontApi};

/// Which backend produced a gateway result.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOutcome<T> {
    Remote(T),
    LocalFallback(T),
    /// Neither backend kept the change.
    Unsaved(T),
}

impl<T> StoreOutcome<T> {
    pub fn value(&self) -> &T {
        match self {
            StoreOutcome::Remote(value)
            | StoreOutcome::LocalFallback(value)
            | StoreOutcome::Unsaved(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            StoreOutcome::Remote(value)
            | StoreOutcome::LocalFallback(value)
            | StoreOutcome::Unsaved(value) => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, StoreOutcome::LocalFallback(_))
    }

    pub fn is_saved(&self) -> bool {
        !matches!(self, StoreOutcome::Unsaved(_))
    }
}

#[derive(Debug, Clone)]
pub struct OrderGateway<A> {
    api: A,
    store: LocalStore,
}

impl<A: StorefrontApi> OrderGateway<A> {
    pub fn new(api: A, store: LocalStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub async fn save_order(&self, order: &Order) -> StoreOutcome<Order> {
        let err = match self.api.create_order(order).await {
            Ok(saved) => {
                tracing::info!(order_id = saved.id, "order saved to remote store");
                return StoreOutcome::Remote(saved);
            }
            Err(err) => err,
        };

        tracing::warn!(error = %err, order_id = order.id, "remote save failed, keeping order locally");
        let record = match serde_json::to_value(order) {
            Ok(record) => record,
            Err(encode_err) => {
                tracing::error!(error = %encode_err, order_id = order.id, "order could not be encoded");
                return StoreOutcome::Unsaved(order.clone());
            }
        };
        let result = self
            .store
            .update_json(ORDERS_KEY, |records: &mut Vec<Value>| {
                records.push(record);
                true
            })
            .await;
        match result {
            Ok(_) => StoreOutcome::LocalFallback(order.clone()),
            Err(store_err) => {
                tracing::error!(error = %store_err, order_id = order.id, "local order save failed");
                StoreOutcome::Unsaved(order.clone())
            }
        }
    }

    /// Orders newest-first from whichever backend answers.
    pub async fn list_orders(&self) -> StoreOutcome<Vec<Order>> {
        let err = match self.api.list_orders().await {
            Ok(orders) => return StoreOutcome::Remote(orders),
            Err(err) => err,
        };

        tracing::warn!(error = %err, "remote listing failed, reading local orders");
        let records = match self.store.load_json::<Vec<Value>>(ORDERS_KEY).await {
            Ok(records) => records.unwrap_or_default(),
            Err(store_err) => {
                tracing::error!(error = %store_err, "local order listing failed");
                Vec::new()
            }
        };

        let mut orders: Vec<Order> = records
            .into_iter()
            .filter_map(|record| {
                let id = record_id(&record);
                match serde_json::from_value(record) {
                    Ok(order) => Some(order),
                    Err(decode_err) => {
                        tracing::warn!(error = %decode_err, order_id = ?id, "skipping unreadable local order");
                        None
                    }
                }
            })
            .collect();
        // Local records are kept in insertion order.
        orders.sort_by(|a, b| b.id.cmp(&a.id));
        StoreOutcome::LocalFallback(orders)
    }

    /// Deleting an unknown id is not an error on either backend.
    pub async fn delete_order(&self, order_id: i64) -> StoreOutcome<()> {
        let err = match self.api.delete_order(order_id).await {
            Ok(()) => {
                tracing::info!(order_id, "order deleted from remote store");
                return StoreOutcome::Remote(());
            }
            Err(err) => err,
        };

        tracing::warn!(error = %err, order_id, "remote delete failed, deleting locally");
        let result = self
            .store
            .update_json(ORDERS_KEY, |records: &mut Vec<Value>| {
                let before = records.len();
                records.retain(|record| record_id(record) != Some(order_id));
                records.len() != before
            })
            .await;
        match result {
            Ok(_) => StoreOutcome::LocalFallback(()),
            Err(store_err) => {
                tracing::error!(error = %store_err, order_id, "local order delete failed");
                StoreOutcome::Unsaved(())
            }
        }
    }
}

/// The id of a stored record, under either `id` or the older `orderId`.
fn record_id(record: &Value) -> Option<i64> {
    record
        .get("id")
        .or_else(|| record.get("orderId"))
        .and_then(Value::as_i64)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    };

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use super::*;
    use crate::{
        dto::auth::{LoginRequest, LoginResponse},
        error::RemoteError,
        models::{CartLineItem, Customer, Payment, PaymentMethod, PaymentStatus},
    };

    /// In-process stand-in for the REST service that can be switched offline.
    #[derive(Default)]
    struct FakeApi {
        offline: AtomicBool,
        orders: Mutex<Vec<Order>>,
    }

    impl FakeApi {
        fn offline() -> Arc<Self> {
            let api = Self::default();
            api.offline.store(true, Ordering::SeqCst);
            Arc::new(api)
        }

        fn check(&self) -> Result<(), RemoteError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(RemoteError::Rejected("offline".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl StorefrontApi for FakeApi {
        async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, RemoteError> {
            self.check()?;
            Ok(LoginResponse::accepted(request.email.clone()))
        }

        async fn create_order(&self, order: &Order) -> Result<Order, RemoteError> {
            self.check()?;
            self.orders.lock().unwrap().push(order.clone());
            Ok(order.clone())
        }

        async fn list_orders(&self) -> Result<Vec<Order>, RemoteError> {
            self.check()?;
            let mut orders = self.orders.lock().unwrap().clone();
            orders.reverse();
            Ok(orders)
        }

        async fn delete_order(&self, order_id: i64) -> Result<(), RemoteError> {
            self.check()?;
            self.orders.lock().unwrap().retain(|o| o.id != order_id);
            Ok(())
        }
    }

    fn order(id: i64) -> Order {
        Order {
            id,
            date: "1/2/2026".into(),
            customer: Customer {
                name: "Linus".into(),
                email: "linus@example.com".into(),
                address: "Helsinki".into(),
            },
            items: vec![CartLineItem {
                id: 4,
                name: "Tablet".into(),
                price: Decimal::new(39999, 2),
                image: String::new(),
                description: "10-inch tablet".into(),
                quantity: 1,
            }],
            total: Decimal::new(39999, 2),
            payment: Payment {
                method: PaymentMethod::CashOnDelivery,
                card_number: None,
                status: PaymentStatus::Completed,
            },
        }
    }

    fn gateway(api: Arc<FakeApi>) -> (OrderGateway<Arc<FakeApi>>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("storage.json"));
        (OrderGateway::new(api, store), dir)
    }

    #[tokio::test]
    async fn failing_remote_saves_and_lists_locally() {
        let (gateway, _dir) = gateway(FakeApi::offline());

        let saved = gateway.save_order(&order(10)).await;
        assert!(saved.is_fallback());

        let listed = gateway.list_orders().await;
        assert!(listed.is_fallback());
        assert_eq!(listed.into_inner(), vec![order(10)]);
    }

    #[tokio::test]
    async fn remote_success_makes_no_local_copy() {
        let api = Arc::new(FakeApi::default());
        let (gateway, _dir) = gateway(api.clone());

        let saved = gateway.save_order(&order(11)).await;
        assert_eq!(saved, StoreOutcome::Remote(order(11)));

        let local: Option<Vec<Order>> = gateway.store().load_json(ORDERS_KEY).await.unwrap();
        assert!(local.is_none());
        assert_eq!(api.orders.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn local_listing_is_newest_first() {
        let (gateway, _dir) = gateway(FakeApi::offline());
        for id in [5, 30, 20] {
            gateway.save_order(&order(id)).await;
        }

        let ids: Vec<i64> = gateway.list_orders().await.into_inner().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![30, 20, 5]);
    }

    #[tokio::test]
    async fn failing_remote_deletes_locally() {
        let (gateway, _dir) = gateway(FakeApi::offline());
        gateway.save_order(&order(1)).await;
        gateway.save_order(&order(2)).await;

        assert!(gateway.delete_order(1).await.is_fallback());
        assert_eq!(gateway.list_orders().await.into_inner(), vec![order(2)]);
    }

    #[tokio::test]
    async fn local_delete_matches_legacy_order_id_field() {
        let (gateway, _dir) = gateway(FakeApi::offline());
        let legacy = serde_json::json!([{
            "orderId": 77,
            "date": "1/2/2026",
            "customer": { "name": "A", "email": "a@b.c", "address": "X" },
            "items": [],
            "total": 0,
            "payment": { "method": "cod", "cardNumber": null, "status": "Completed" }
        }]);
        gateway
            .store()
            .set_item(ORDERS_KEY, legacy.to_string())
            .await
            .unwrap();

        gateway.delete_order(77).await;
        assert!(gateway.list_orders().await.into_inner().is_empty());
    }

    #[tokio::test]
    async fn deleting_unknown_id_changes_nothing() {
        let api = Arc::new(FakeApi::default());
        let (gateway, _dir) = gateway(api.clone());
        gateway.save_order(&order(3)).await;

        assert_eq!(gateway.delete_order(999).await, StoreOutcome::Remote(()));
        assert_eq!(api.orders.lock().unwrap().len(), 1);

        api.offline.store(true, Ordering::SeqCst);
        assert!(gateway.delete_order(999).await.is_fallback());
        assert!(gateway.store().get_item(ORDERS_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_racing_list_sees_before_or_after_state() {
        let (gateway, _dir) = gateway(FakeApi::offline());
        gateway.save_order(&order(1)).await;
        gateway.save_order(&order(2)).await;

        let (_, listed) = tokio::join!(gateway.delete_order(1), gateway.list_orders());
        let len = listed.into_inner().len();
        assert!(len == 1 || len == 2);
        assert_eq!(gateway.list_orders().await.into_inner(), vec![order(2)]);
    }

    #[tokio::test]
    async fn undecodable_local_record_does_not_block_new_orders() {
        let (gateway, _dir) = gateway(FakeApi::offline());
        let foreign = serde_json::json!([{
            "id": 1,
            "date": "1/2/2026",
            "customer": { "name": "A", "email": "a@b.c", "address": "X" },
            "items": [],
            "total": 0,
            "payment": { "method": "paypal", "status": "Completed" }
        }]);
        gateway
            .store()
            .set_item(ORDERS_KEY, foreign.to_string())
            .await
            .unwrap();

        let saved = gateway.save_order(&order(2)).await;
        assert_eq!(saved, StoreOutcome::LocalFallback(order(2)));
        assert_eq!(gateway.list_orders().await.into_inner(), vec![order(2)]);

        let raw: Vec<serde_json::Value> = gateway.store().load_json(ORDERS_KEY).await.unwrap().unwrap();
        assert_eq!(raw.len(), 2);

        assert!(gateway.delete_order(1).await.is_fallback());
        let raw: Vec<serde_json::Value> = gateway.store().load_json(ORDERS_KEY).await.unwrap().unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(gateway.list_orders().await.into_inner(), vec![order(2)]);
    }

    #[tokio::test]
    async fn failed_local_write_is_reported_unsaved() {
        let (gateway, _dir) = gateway(FakeApi::offline());
        std::fs::write(gateway.store().path(), "{broken").unwrap();

        let saved = gateway.save_order(&order(8)).await;
        assert_eq!(saved, StoreOutcome::Unsaved(order(8)));
        assert!(!saved.is_saved());
        assert!(!gateway.delete_order(8).await.is_saved());
    }

    #[tokio::test]
    async fn unreadable_local_store_degrades_to_empty_list() {
        let (gateway, _dir) = gateway(FakeApi::offline());
        std::fs::write(gateway.store().path(), "{broken").unwrap();

        let listed = gateway.list_orders().await;
        assert!(listed.is_fallback());
        assert!(listed.value().is_empty());
    }
}
