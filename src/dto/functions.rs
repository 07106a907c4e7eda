use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::orders::OrderItemSnapshot, validation::OrderLine};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateOrderRequest {
    pub items: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateOrderResponse {
    pub valid: bool,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub calculated_total: Decimal,
}

/// Body of a rejected validation. Totals are absent when the order could not
/// be priced at all.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationFailure {
    pub error: String,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub calculated_total: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub submitted_total: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderNotificationRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub delivery_address: String,
    pub items: Vec<OrderItemSnapshot>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderNotificationResponse {
    pub success: bool,
    #[serde(rename = "ownerEmail")]
    pub owner_email: serde_json::Value,
    #[serde(rename = "customerEmail")]
    pub customer_email: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FunctionErrorBody {
    pub error: String,
}
