use askama::Template;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    dto::{
        functions::{OrderNotificationRequest, OrderNotificationResponse},
        orders::OrderItemSnapshot,
    },
    services::mailer::{MailError, OutgoingEmail},
    state::AppState,
    validation::{OrderValidationError, OrderValidator, TOTAL_TOLERANCE},
};

const CURRENCY: &str = "GHS";

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Order has no items")]
    EmptyOrder,

    #[error(transparent)]
    InvalidOrder(#[from] OrderValidationError),

    #[error("Failed to render email: {0}")]
    Template(#[from] askama::Error),

    #[error(transparent)]
    Mail(#[from] MailError),
}

impl NotificationError {
    /// Errors caused by the request itself rather than rendering or delivery.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            NotificationError::EmptyOrder | NotificationError::InvalidOrder(_)
        )
    }
}

struct EmailLine {
    label: String,
    amount: String,
}

// Askama escapes every interpolated value in .html templates, so customer
// input is rendered as text.
#[derive(Template)]
#[template(path = "email/order_owner.html")]
struct OwnerOrderEmail<'a> {
    full_name: &'a str,
    email: &'a str,
    phone_number: &'a str,
    delivery_address: &'a str,
    lines: &'a [EmailLine],
    total: &'a str,
    currency: &'a str,
}

#[derive(Template)]
#[template(path = "email/order_customer.html")]
struct CustomerOrderEmail<'a> {
    full_name: &'a str,
    delivery_address: &'a str,
    lines: &'a [EmailLine],
    total: &'a str,
    currency: &'a str,
    owner_email: &'a str,
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Email the store owner and the customer about a placed order.
pub async fn send_order_notification(
    state: &AppState,
    payload: &OrderNotificationRequest,
) -> Result<OrderNotificationResponse, NotificationError> {
    if payload.items.is_empty() {
        return Err(NotificationError::EmptyOrder);
    }

    tracing::info!(
        customer = %payload.email,
        items = payload.items.len(),
        "processing order notification"
    );

    // Names, prices and the total come from the ledger; the caller's are
    // only compared for logging.
    let order_lines: Vec<_> = payload.items.iter().map(OrderItemSnapshot::line).collect();
    let priced = OrderValidator::canonical().price_lines(&order_lines)?;
    let ledger_total = OrderValidator::total_of(&priced)?;
    let drift = ledger_total.checked_sub(payload.total_amount);
    if !drift.is_some_and(|d| d.abs() <= TOTAL_TOLERANCE) {
        tracing::warn!(
            calculated_total = %ledger_total,
            total_amount = %payload.total_amount,
            "notification total differs from ledger, using ledger"
        );
    }

    let lines: Vec<EmailLine> = priced
        .iter()
        .map(|line| EmailLine {
            label: format!("{} x {}", line.name, line.quantity),
            amount: money(line.amount),
        })
        .collect();
    let total = money(ledger_total);
    let mail = &state.config.mail;

    let owner_html = OwnerOrderEmail {
        full_name: &payload.full_name,
        email: &payload.email,
        phone_number: &payload.phone_number,
        delivery_address: &payload.delivery_address,
        lines: &lines,
        total: &total,
        currency: CURRENCY,
    }
    .render()?;

    let customer_html = CustomerOrderEmail {
        full_name: &payload.full_name,
        delivery_address: &payload.delivery_address,
        lines: &lines,
        total: &total,
        currency: CURRENCY,
        owner_email: &mail.owner_email,
    }
    .render()?;

    let owner_ack = state
        .mailer
        .send(&OutgoingEmail {
            from: mail.owner_from.clone(),
            to: vec![mail.owner_email.clone()],
            subject: format!("New Order from {}", payload.full_name),
            html: owner_html,
        })
        .await?;
    tracing::info!(ack = %owner_ack, "owner notification sent");

    let customer_ack = state
        .mailer
        .send(&OutgoingEmail {
            from: mail.customer_from.clone(),
            to: vec![payload.email.clone()],
            subject: "Order Confirmation".to_string(),
            html: customer_html,
        })
        .await?;
    tracing::info!(ack = %customer_ack, "customer confirmation sent");

    Ok(OrderNotificationResponse {
        success: true,
        owner_email: owner_ack,
        customer_email: customer_ack,
    })
}
