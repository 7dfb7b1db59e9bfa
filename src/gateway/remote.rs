use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        orders::{CreateOrderRequest, OrderDocument},
    },
    error::RemoteError,
    models::Order,
    response::SuccessFlag,
};

/// The REST surface of the remote order service.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, RemoteError>;

    async fn create_order(&self, order: &Order) -> Result<Order, RemoteError>;

    /// Orders newest-first, as the service stores them.
    async fn list_orders(&self) -> Result<Vec<Order>, RemoteError>;

    async fn delete_order(&self, order_id: i64) -> Result<(), RemoteError>;
}

#[async_trait]
impl<T: StorefrontApi + ?Sized> StorefrontApi for Arc<T> {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, RemoteError> {
        (**self).login(request).await
    }

    async fn create_order(&self, order: &Order) -> Result<Order, RemoteError> {
        (**self).create_order(order).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RemoteError> {
        (**self).list_orders().await
    }

    async fn delete_order(&self, order_id: i64) -> Result<(), RemoteError> {
        (**self).delete_order(order_id).await
    }
}

#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    client: Client,
    base_url: String,
}

impl HttpStorefrontApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, RemoteError> {
        let response = self.client.post(self.url("login")).json(request).send().await?;
        let status = response.status();
        // Rejections come back as non-2xx with a login-shaped body.
        match response.json::<LoginResponse>().await {
            Ok(body) => Ok(body),
            Err(err) if status.is_success() => Err(err.into()),
            Err(_) => Err(RemoteError::Status(status)),
        }
    }

    async fn create_order(&self, order: &Order) -> Result<Order, RemoteError> {
        let response = self
            .client
            .post(self.url("orders"))
            .json(&CreateOrderRequest::from(order))
            .send()
            .await?;
        let doc: OrderDocument = ensure_success(response)?.json().await?;
        Ok(doc.into())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RemoteError> {
        let response = self.client.get(self.url("orders")).send().await?;
        let docs: Vec<OrderDocument> = ensure_success(response)?.json().await?;
        Ok(docs.into_iter().map(Order::from).collect())
    }

    async fn delete_order(&self, order_id: i64) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(self.url(&format!("orders/{order_id}")))
            .send()
            .await?;
        let flag: SuccessFlag = ensure_success(response)?.json().await?;
        if !flag.success {
            return Err(RemoteError::Rejected(format!("delete of order {order_id}")));
        }
        Ok(())
    }
}

fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::Status(status));
    }
    Ok(response)
}
