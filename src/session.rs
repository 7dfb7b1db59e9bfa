use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    cart::Cart,
    catalog::Catalog,
    checkout::{CheckoutFlow, CheckoutStage, PaymentInfo},
    dto::auth::LoginRequest,
    error::{CheckoutError, LoginError},
    gateway::{OrderGateway, StoreOutcome, StorefrontApi},
    local_store::{CART_KEY, LocalStore, USER_EMAIL_KEY},
    models::{CartLineItem, Customer, Order},
};

/// One signed-in shopper: the cart, the checkout flow and the order gateway.
///
/// Created by [`Session::login`] or [`Session::resume`], consumed by
/// [`Session::logout`].
#[derive(Debug)]
pub struct Session<A> {
    email: String,
    catalog: Arc<Catalog>,
    cart: Cart,
    checkout: CheckoutFlow,
    gateway: OrderGateway<A>,
}

impl<A: StorefrontApi> Session<A> {
    pub async fn login(
        api: A,
        store: LocalStore,
        catalog: Arc<Catalog>,
        email: &str,
        password: &str,
    ) -> Result<Self, LoginError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = api.login(&request).await?;
        if !response.success {
            let reason = response.error.unwrap_or_else(|| "Unknown error".to_string());
            return Err(LoginError::Rejected(reason));
        }

        if let Err(err) = store.set_item(USER_EMAIL_KEY, request.email.clone()).await {
            tracing::warn!(error = %err, "failed to remember signed-in user");
        }
        tracing::info!(email = %request.email, "signed in");
        Ok(Self::open(api, store, catalog, request.email).await)
    }

    /// Restores the previous session when a signed-in user is remembered.
    pub async fn resume(api: A, store: LocalStore, catalog: Arc<Catalog>) -> Option<Self> {
        let email = match store.get_item(USER_EMAIL_KEY).await {
            Ok(email) => email?,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read signed-in user");
                return None;
            }
        };
        Some(Self::open(api, store, catalog, email).await)
    }

    async fn open(api: A, store: LocalStore, catalog: Arc<Catalog>, email: String) -> Self {
        let items = match store.load_json::<Vec<CartLineItem>>(CART_KEY).await {
            Ok(items) => items.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable saved cart");
                Vec::new()
            }
        };

        Self {
            email,
            catalog,
            cart: Cart::from_items(items),
            checkout: CheckoutFlow::new(),
            gateway: OrderGateway::new(api, store),
        }
    }

    /// Forgets the signed-in user. The saved cart is kept for the next login.
    pub async fn logout(self) {
        if let Err(err) = self.gateway.store().remove_item(USER_EMAIL_KEY).await {
            tracing::warn!(error = %err, "failed to forget signed-in user");
        }
        tracing::info!(email = %self.email, "signed out");
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    pub fn stage(&self) -> CheckoutStage {
        self.checkout.stage()
    }

    pub fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }

    pub async fn add_to_cart(&mut self, product_id: i64) -> Result<(), CheckoutError> {
        let product = self
            .catalog
            .find(product_id)
            .ok_or(CheckoutError::UnknownProduct(product_id))?;
        self.cart.add(product);
        self.save_cart().await;
        Ok(())
    }

    pub async fn update_quantity(&mut self, product_id: i64, delta: i64) {
        self.cart.update_quantity(product_id, delta);
        self.save_cart().await;
    }

    pub async fn remove_from_cart(&mut self, product_id: i64) {
        self.cart.remove(product_id);
        self.save_cart().await;
    }

    pub fn open_cart(&mut self) {
        self.checkout.open_cart();
    }

    pub fn proceed_to_checkout(&mut self) -> Result<(), CheckoutError> {
        self.checkout.proceed_to_checkout(&self.cart)
    }

    pub fn proceed_to_payment(&mut self, customer: Customer) -> Result<(), CheckoutError> {
        self.checkout.proceed_to_payment(customer)
    }

    /// Finalizes the cart and hands the order to the gateway. Persistence
    /// never fails the checkout; the outcome tells which store kept it.
    pub async fn process_payment(
        &mut self,
        payment: &PaymentInfo,
    ) -> Result<StoreOutcome<Order>, CheckoutError> {
        let order = self.checkout.process_payment(&mut self.cart, payment)?;
        let outcome = self.gateway.save_order(&order).await;
        self.save_cart().await;
        Ok(outcome)
    }

    pub fn go_back(&mut self) {
        self.checkout.go_back();
    }

    pub fn start_over(&mut self) {
        self.checkout.start_over();
    }

    pub async fn orders(&self) -> StoreOutcome<Vec<Order>> {
        self.gateway.list_orders().await
    }

    pub async fn delete_order(&self, order_id: i64) -> StoreOutcome<()> {
        self.gateway.delete_order(order_id).await
    }

    async fn save_cart(&self) {
        if let Err(err) = self.gateway.store().save_json(CART_KEY, self.cart.items()).await {
            tracing::warn!(error = %err, "failed to save cart locally");
        }
    }
}
