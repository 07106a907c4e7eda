//! Endpoints mirroring the storefront's remote functions. They answer with
//! bare JSON bodies rather than the `ApiResponse` envelope.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::{
    dto::functions::{
        FunctionErrorBody, OrderNotificationRequest, OrderNotificationResponse,
        ValidateOrderRequest, ValidateOrderResponse, ValidationFailure,
    },
    middleware::auth::AuthUser,
    services::{notification_service, validation_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate-order", post(validate_order))
        .route("/send-order-notification", post(send_order_notification))
}

#[utoipa::path(
    post,
    path = "/api/functions/validate-order",
    request_body = ValidateOrderRequest,
    responses(
        (status = 200, description = "Totals match", body = ValidateOrderResponse),
        (status = 400, description = "Price mismatch, unknown product or bad quantity", body = ValidationFailure),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Functions"
)]
pub async fn validate_order(
    user: AuthUser,
    Json(payload): Json<ValidateOrderRequest>,
) -> Response {
    match validation_service::validate_order(&user, &payload) {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(failure) => (StatusCode::BAD_REQUEST, Json(failure)).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/functions/send-order-notification",
    request_body = OrderNotificationRequest,
    responses(
        (status = 200, description = "Owner and customer emails sent", body = OrderNotificationResponse),
        (status = 400, description = "Empty order, unknown product or bad quantity", body = FunctionErrorBody),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Sending failed", body = FunctionErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "Functions"
)]
pub async fn send_order_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<OrderNotificationRequest>,
) -> Response {
    match notification_service::send_order_notification(&state, &payload).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => {
            let status = if err.is_client_error() {
                tracing::warn!(user_id = %user.user_id, error = %err, "order notification rejected");
                StatusCode::BAD_REQUEST
            } else {
                tracing::error!(user_id = %user.user_id, error = %err, "order notification failed");
                StatusCode::INTERNAL_SERVER_ERROR
            };
            let body = FunctionErrorBody {
                error: err.to_string(),
            };
            (status, Json(body)).into_response()
        }
    }
}
