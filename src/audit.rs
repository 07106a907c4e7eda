//! Append-only audit trail of account and order events.

use rust_decimal::Decimal;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::db::DbPool;

#[derive(Debug, Clone, PartialEq)]
pub enum AuditEvent {
    UserRegistered,
    UserLoggedIn,
    OrderCreated { order_id: Uuid, total_amount: Decimal },
}

impl AuditEvent {
    pub fn action(&self) -> &'static str {
        match self {
            AuditEvent::UserRegistered => "user_register",
            AuditEvent::UserLoggedIn => "user_login",
            AuditEvent::OrderCreated { .. } => "order_created",
        }
    }

    pub fn resource(&self) -> &'static str {
        match self {
            AuditEvent::UserRegistered | AuditEvent::UserLoggedIn => "users",
            AuditEvent::OrderCreated { .. } => "orders",
        }
    }

    fn metadata(&self, user_id: Uuid) -> Value {
        match self {
            AuditEvent::UserRegistered | AuditEvent::UserLoggedIn => json!({ "user_id": user_id }),
            AuditEvent::OrderCreated {
                order_id,
                total_amount,
            } => json!({ "order_id": order_id, "total_amount": total_amount.to_string() }),
        }
    }
}

pub async fn insert_audit(pool: &DbPool, user_id: Uuid, event: &AuditEvent) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(event.action())
    .bind(event.resource())
    .bind(event.metadata(user_id))
    .execute(pool)
    .await?;

    Ok(())
}

/// Audit entries never fail the request that produced them.
pub async fn record_audit(pool: &DbPool, user_id: Uuid, event: AuditEvent) {
    if let Err(err) = insert_audit(pool, user_id, &event).await {
        tracing::warn!(action = event.action(), error = %err, "audit log failed");
    }
}
