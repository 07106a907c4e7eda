use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::{AuditEvent, record_audit},
    dto::orders::{OrderItemSnapshot, OrderList, OrderSubmission},
    entity::orders::{
        ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
    validation::OrderValidator,
};

/// Persist a submitted order.
///
/// The stored total and item prices are always the ledger's; the submitted
/// total only has to agree with it within tolerance.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: OrderSubmission,
) -> AppResult<ApiResponse<Order>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Order has no items".into()));
    }
    for (field, value) in [
        ("full_name", &payload.full_name),
        ("email", &payload.email),
        ("phone_number", &payload.phone_number),
        ("delivery_address", &payload.delivery_address),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{field} is required")));
        }
    }

    let report = OrderValidator::canonical().validate(&payload.lines(), payload.total_amount)?;
    if !report.valid {
        tracing::warn!(
            user_id = %user.user_id,
            calculated_total = %report.calculated_total,
            total_amount = %payload.total_amount,
            "order total mismatch"
        );
        return Err(AppError::PriceMismatch {
            calculated_total: report.calculated_total,
            submitted_total: payload.total_amount,
        });
    }

    let items = ledger_snapshot(&payload.items)?;
    let items_json = serde_json::to_value(&items).map_err(anyhow::Error::from)?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        full_name: Set(payload.full_name),
        email: Set(payload.email),
        phone_number: Set(payload.phone_number),
        delivery_address: Set(payload.delivery_address),
        items: Set(items_json),
        total_amount: Set(report.calculated_total),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    record_audit(
        &state.pool,
        user.user_id,
        AuditEvent::OrderCreated {
            order_id: order.id,
            total_amount: order.total_amount,
        },
    )
    .await;

    tracing::info!(order_id = %order.id, user_id = %user.user_id, "order persisted");

    Ok(ApiResponse::success(
        "Order placed",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let window = query.pagination().window();

    let mut finder = Orders::find().filter(OrderCol::UserId.eq(user.user_id));
    finder = match query.sort() {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(window.per_page as u64)
        .offset(window.offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(Meta::for_window(window, total)),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "OK",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

/// Rebuild the item snapshot from ledger names and prices.
fn ledger_snapshot(items: &[OrderItemSnapshot]) -> AppResult<Vec<OrderItemSnapshot>> {
    let lines: Vec<_> = items.iter().map(OrderItemSnapshot::line).collect();
    let priced = OrderValidator::canonical().price_lines(&lines)?;
    Ok(priced.iter().map(OrderItemSnapshot::from).collect())
}

fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let items: Vec<OrderItemSnapshot> =
        serde_json::from_value(model.items).map_err(anyhow::Error::from)?;
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        full_name: model.full_name,
        email: model.email,
        phone_number: model.phone_number,
        delivery_address: model.delivery_address,
        items,
        total_amount: model.total_amount,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
