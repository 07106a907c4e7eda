//! Checkout state machine for a single order submission.

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    dto::{
        functions::{OrderNotificationRequest, ValidateOrderRequest},
        orders::OrderSubmission,
    },
    storefront::{
        cart::Cart,
        form::{CheckoutForm, FormError},
        gateway::{HttpBackend, OrderNotifier, OrderRepository, OrderValidationService},
        session::SessionGate,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Delivered,
    /// The order was stored but the emails were not sent.
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    Validating,
    PersistingOrder,
    NotifyingParties,
    Succeeded(NotificationStatus),
    ValidationFailed,
    PersistenceFailed,
}

impl CheckoutState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CheckoutState::Succeeded(_)
                | CheckoutState::ValidationFailed
                | CheckoutState::PersistenceFailed
        )
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckoutState::Idle => "idle",
            CheckoutState::Validating => "validating",
            CheckoutState::PersistingOrder => "persisting_order",
            CheckoutState::NotifyingParties => "notifying_parties",
            CheckoutState::Succeeded(NotificationStatus::Delivered) => "succeeded",
            CheckoutState::Succeeded(NotificationStatus::Degraded) => "succeeded_degraded",
            CheckoutState::ValidationFailed => "validation_failed",
            CheckoutState::PersistenceFailed => "persistence_failed",
        })
    }
}

/// Everything a UI needs to surface. Details behind `ValidationFailed` and
/// `PersistenceFailed` are logged, not carried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("sign in to place an order")]
    AuthenticationRequired,

    #[error("your cart is empty")]
    EmptyCart,

    #[error(transparent)]
    FormInvalid(#[from] FormError),

    #[error("we could not verify your order, please try again")]
    ValidationFailed,

    #[error("failed to place order, please try again")]
    PersistenceFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: Uuid,
    pub total_amount: Decimal,
    pub notification: NotificationStatus,
}

impl CheckoutReceipt {
    pub fn is_degraded(&self) -> bool {
        self.notification == NotificationStatus::Degraded
    }
}

/// Remote collaborators used by a checkout.
#[derive(Clone)]
pub struct CheckoutServices {
    pub validator: Arc<dyn OrderValidationService>,
    pub orders: Arc<dyn OrderRepository>,
    pub notifier: Arc<dyn OrderNotifier>,
}

impl CheckoutServices {
    pub fn http(backend: HttpBackend) -> Self {
        let backend = Arc::new(backend);
        Self {
            validator: backend.clone(),
            orders: backend.clone(),
            notifier: backend,
        }
    }
}

pub struct CheckoutOrchestrator {
    services: CheckoutServices,
    state: CheckoutState,
}

impl CheckoutOrchestrator {
    pub fn new(services: CheckoutServices) -> Self {
        Self {
            services,
            state: CheckoutState::Idle,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    fn transition(&mut self, next: CheckoutState) {
        tracing::debug!(from = %self.state, to = %next, "checkout transition");
        self.state = next;
    }

    /// Run one submission attempt.
    ///
    /// Validation, persistence and notification are awaited in that order;
    /// each must finish before the next starts. Only a notification failure
    /// is tolerated, and the cart and form are cleared only on success.
    pub async fn submit(
        &mut self,
        gate: &SessionGate,
        cart: &mut Cart,
        form: &mut CheckoutForm,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if self.state.is_terminal() {
            self.transition(CheckoutState::Idle);
        }

        let Some(session) = gate.current() else {
            return Err(CheckoutError::AuthenticationRequired);
        };
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        form.validate()?;

        self.transition(CheckoutState::Validating);
        let request = ValidateOrderRequest {
            items: cart.order_lines(),
            total_amount: cart.total_price(),
        };
        let report = match self.services.validator.validate_order(&session, &request).await {
            Ok(report) if report.valid => report,
            Ok(report) => {
                tracing::warn!(
                    calculated_total = %report.calculated_total,
                    submitted_total = %request.total_amount,
                    "order total rejected"
                );
                self.transition(CheckoutState::ValidationFailed);
                return Err(CheckoutError::ValidationFailed);
            }
            Err(err) => {
                tracing::warn!(error = %err, "order validation failed");
                self.transition(CheckoutState::ValidationFailed);
                return Err(CheckoutError::ValidationFailed);
            }
        };

        self.transition(CheckoutState::PersistingOrder);
        let items = cart.snapshot();
        let clean = form.sanitized();
        let submission = OrderSubmission {
            full_name: clean.full_name,
            email: clean.email,
            phone_number: clean.phone_number,
            delivery_address: clean.delivery_address,
            items: items.clone(),
            total_amount: report.calculated_total,
        };
        let persisted = match self.services.orders.insert_order(&session, &submission).await {
            Ok(persisted) => persisted,
            Err(err) => {
                tracing::error!(error = %err, "order persistence failed");
                self.transition(CheckoutState::PersistenceFailed);
                return Err(CheckoutError::PersistenceFailed);
            }
        };

        self.transition(CheckoutState::NotifyingParties);
        // The email templates escape on render, so they get the raw input.
        let notification = OrderNotificationRequest {
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone_number: form.phone_number.trim().to_string(),
            delivery_address: form.delivery_address.trim().to_string(),
            items,
            total_amount: report.calculated_total,
        };
        let status = match self
            .services
            .notifier
            .send_order_notification(&session, &notification)
            .await
        {
            Ok(ack) if ack.success => NotificationStatus::Delivered,
            Ok(_) => {
                tracing::warn!(order_id = %persisted.id, "notification reported no success");
                NotificationStatus::Degraded
            }
            Err(err) => {
                tracing::warn!(order_id = %persisted.id, error = %err, "order placed but email failed");
                NotificationStatus::Degraded
            }
        };

        self.transition(CheckoutState::Succeeded(status));
        cart.clear();
        form.reset();

        tracing::info!(order_id = %persisted.id, total_amount = %persisted.total_amount, "order placed");
        Ok(CheckoutReceipt {
            order_id: persisted.id,
            total_amount: persisted.total_amount,
            notification: status,
        })
    }
}
