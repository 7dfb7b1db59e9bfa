//! Checkout stages: `Catalog → Cart → OrderReview → Payment → Confirmation`.
//!
//! Forward moves check the previous stage's precondition. Backward moves only
//! happen through explicit navigation ([`CheckoutFlow::go_back`],
//! [`CheckoutFlow::open_cart`], [`CheckoutFlow::start_over`]).

use serde::{Deserialize, Serialize};

use crate::{
    cart::Cart,
    error::CheckoutError,
    models::{Customer, Order, PaymentMethod},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckoutStage {
    Catalog,
    Cart,
    OrderReview,
    Payment,
    Confirmation,
}

impl CheckoutStage {
    fn previous(self) -> Self {
        match self {
            CheckoutStage::Catalog | CheckoutStage::Cart => CheckoutStage::Catalog,
            CheckoutStage::OrderReview => CheckoutStage::Cart,
            CheckoutStage::Payment => CheckoutStage::OrderReview,
            CheckoutStage::Confirmation => CheckoutStage::Catalog,
        }
    }
}

/// Payment form contents as entered. Card fields are ignored for cash on
/// delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl PaymentInfo {
    pub fn cash_on_delivery() -> Self {
        Self {
            method: PaymentMethod::CashOnDelivery,
            card_number: String::new(),
            expiry: String::new(),
            cvv: String::new(),
        }
    }

    pub fn card(
        card_number: impl Into<String>,
        expiry: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            method: PaymentMethod::Card,
            card_number: card_number.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.method == PaymentMethod::CashOnDelivery {
            return Ok(());
        }
        let blank = [&self.card_number, &self.expiry, &self.cvv]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank {
            return Err(CheckoutError::MissingCardDetails);
        }
        Ok(())
    }
}

pub fn validate_customer(customer: &Customer) -> Result<(), CheckoutError> {
    for (field, value) in [
        ("name", &customer.name),
        ("email", &customer.email),
        ("address", &customer.address),
    ] {
        if value.trim().is_empty() {
            return Err(CheckoutError::MissingField(field));
        }
    }
    if !customer.email.contains('@') {
        return Err(CheckoutError::InvalidEmail);
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    stage: CheckoutStage,
    customer: Option<Customer>,
    confirmation: Option<Order>,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self {
            stage: CheckoutStage::Catalog,
            customer: None,
            confirmation: None,
        }
    }

    pub fn stage(&self) -> CheckoutStage {
        self.stage
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// The order produced by the last completed payment.
    pub fn confirmation(&self) -> Option<&Order> {
        self.confirmation.as_ref()
    }

    pub fn open_cart(&mut self) {
        self.stage = CheckoutStage::Cart;
    }

    pub fn proceed_to_checkout(&mut self, cart: &Cart) -> Result<(), CheckoutError> {
        self.expect_stage(CheckoutStage::Cart, CheckoutStage::OrderReview)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.stage = CheckoutStage::OrderReview;
        Ok(())
    }

    pub fn proceed_to_payment(&mut self, customer: Customer) -> Result<(), CheckoutError> {
        self.expect_stage(CheckoutStage::OrderReview, CheckoutStage::Payment)?;
        validate_customer(&customer)?;
        self.customer = Some(customer);
        self.stage = CheckoutStage::Payment;
        Ok(())
    }

    /// Finalizes the cart into an order. The cart is cleared only on success.
    pub fn process_payment(
        &mut self,
        cart: &mut Cart,
        payment: &PaymentInfo,
    ) -> Result<Order, CheckoutError> {
        self.expect_stage(CheckoutStage::Payment, CheckoutStage::Confirmation)?;
        let customer = self
            .customer
            .as_ref()
            .ok_or(CheckoutError::MissingField("name"))?;

        let order = cart.finalize_order(customer, payment)?;
        self.confirmation = Some(order.clone());
        self.stage = CheckoutStage::Confirmation;
        Ok(order)
    }

    pub fn go_back(&mut self) {
        self.stage = self.stage.previous();
    }

    pub fn start_over(&mut self) {
        self.stage = CheckoutStage::Catalog;
        self.customer = None;
        self.confirmation = None;
    }

    fn expect_stage(&self, from: CheckoutStage, to: CheckoutStage) -> Result<(), CheckoutError> {
        if self.stage != from {
            return Err(CheckoutError::InvalidTransition {
                from: self.stage,
                to,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn customer() -> Customer {
        Customer {
            name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            address: "1 Harbor Rd".into(),
        }
    }

    fn filled_cart() -> Cart {
        let catalog = Catalog::seeded();
        let mut cart = Cart::new();
        cart.add(catalog.find(5).expect("watch"));
        cart
    }

    #[test]
    fn walks_every_stage_in_order() {
        let mut cart = filled_cart();
        let mut flow = CheckoutFlow::new();
        assert_eq!(flow.stage(), CheckoutStage::Catalog);

        flow.open_cart();
        flow.proceed_to_checkout(&cart).unwrap();
        assert_eq!(flow.stage(), CheckoutStage::OrderReview);

        flow.proceed_to_payment(customer()).unwrap();
        assert_eq!(flow.stage(), CheckoutStage::Payment);

        let order = flow
            .process_payment(&mut cart, &PaymentInfo::card("4242424242424242", "01/30", "999"))
            .unwrap();
        assert_eq!(flow.stage(), CheckoutStage::Confirmation);
        assert_eq!(flow.confirmation().map(|o| o.id), Some(order.id));
        assert_eq!(order.customer, customer());
        assert!(cart.is_empty());
    }

    #[test]
    fn empty_cart_cannot_leave_cart_stage() {
        let cart = Cart::new();
        let mut flow = CheckoutFlow::new();
        flow.open_cart();
        assert_eq!(flow.proceed_to_checkout(&cart), Err(CheckoutError::EmptyCart));
        assert_eq!(flow.stage(), CheckoutStage::Cart);
    }

    #[test]
    fn order_review_requires_customer_fields() {
        let cart = filled_cart();
        let mut flow = CheckoutFlow::new();
        flow.open_cart();
        flow.proceed_to_checkout(&cart).unwrap();

        let mut missing_address = customer();
        missing_address.address = "  ".into();
        assert_eq!(
            flow.proceed_to_payment(missing_address),
            Err(CheckoutError::MissingField("address"))
        );

        let mut bad_email = customer();
        bad_email.email = "grace.example.com".into();
        assert_eq!(flow.proceed_to_payment(bad_email), Err(CheckoutError::InvalidEmail));
        assert_eq!(flow.stage(), CheckoutStage::OrderReview);
    }

    #[test]
    fn failed_payment_keeps_stage_and_cart() {
        let mut cart = filled_cart();
        let mut flow = CheckoutFlow::new();
        flow.open_cart();
        flow.proceed_to_checkout(&cart).unwrap();
        flow.proceed_to_payment(customer()).unwrap();

        let err = flow
            .process_payment(&mut cart, &PaymentInfo::card("", "", ""))
            .unwrap_err();
        assert_eq!(err, CheckoutError::MissingCardDetails);
        assert_eq!(flow.stage(), CheckoutStage::Payment);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn skipping_a_stage_is_rejected() {
        let mut cart = filled_cart();
        let mut flow = CheckoutFlow::new();
        let err = flow
            .process_payment(&mut cart, &PaymentInfo::cash_on_delivery())
            .unwrap_err();
        assert_eq!(
            err,
            CheckoutError::InvalidTransition {
                from: CheckoutStage::Catalog,
                to: CheckoutStage::Confirmation,
            }
        );
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn go_back_walks_one_stage() {
        let cart = filled_cart();
        let mut flow = CheckoutFlow::new();
        flow.open_cart();
        flow.proceed_to_checkout(&cart).unwrap();
        flow.proceed_to_payment(customer()).unwrap();

        flow.go_back();
        assert_eq!(flow.stage(), CheckoutStage::OrderReview);
        flow.go_back();
        assert_eq!(flow.stage(), CheckoutStage::Cart);
    }

    #[test]
    fn start_over_resets_forms_but_keeps_cart() {
        let cart = filled_cart();
        let mut flow = CheckoutFlow::new();
        flow.open_cart();
        flow.proceed_to_checkout(&cart).unwrap();
        flow.proceed_to_payment(customer()).unwrap();

        flow.start_over();
        assert_eq!(flow.stage(), CheckoutStage::Catalog);
        assert!(flow.customer().is_none());
        assert_eq!(cart.item_count(), 1);
    }
}
