//! Client side of the store: one `Storefront` per signed-in browsing session.
//!
//! It owns the cart, the checkout form, the session gate and the checkout
//! orchestrator, and is handed to whatever renders the UI.

pub mod cart;
pub mod checkout;
pub mod form;
pub mod gateway;
pub mod session;

use thiserror::Error;

use crate::catalog::{Product, ProductId};

use self::{
    cart::{Cart, CartError},
    checkout::{CheckoutError, CheckoutOrchestrator, CheckoutReceipt, CheckoutServices, CheckoutState},
    form::CheckoutForm,
    session::{SessionGate, SessionProvider},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorefrontError {
    #[error("sign in to add items to your cart")]
    AuthenticationRequired,

    #[error(transparent)]
    Cart(#[from] CartError),
}

pub struct Storefront {
    cart: Cart,
    form: CheckoutForm,
    gate: SessionGate,
    checkout: CheckoutOrchestrator,
}

impl Storefront {
    /// Start a storefront with an empty cart, tracking `provider`'s session.
    pub async fn start(provider: &dyn SessionProvider, services: CheckoutServices) -> Self {
        Self {
            cart: Cart::new(),
            form: CheckoutForm::default(),
            gate: SessionGate::start(provider).await,
            checkout: CheckoutOrchestrator::new(services),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CheckoutForm {
        &mut self.form
    }

    pub fn session(&self) -> &SessionGate {
        &self.gate
    }

    pub fn checkout_state(&self) -> CheckoutState {
        self.checkout.state()
    }

    /// Add `quantity` of `product`. Signed-out callers get
    /// `AuthenticationRequired` and the cart is left alone; retrying after
    /// sign-in is up to them.
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) -> Result<(), StorefrontError> {
        if !self.gate.is_authenticated() {
            tracing::debug!(product_id = %product.id, "add to cart blocked, not signed in");
            return Err(StorefrontError::AuthenticationRequired);
        }
        self.cart.add_item(product, quantity)?;
        Ok(())
    }

    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> Result<(), StorefrontError> {
        self.cart.update_quantity(id, quantity)?;
        Ok(())
    }

    pub fn remove_from_cart(&mut self, id: ProductId) {
        self.cart.remove_item(id);
    }

    pub fn reset_cart(&mut self) {
        self.cart.clear();
    }

    pub async fn place_order(&mut self) -> Result<CheckoutReceipt, CheckoutError> {
        self.checkout
            .submit(&self.gate, &mut self.cart, &mut self.form)
            .await
    }
}
