use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    catalog::ProductId,
    models::Order,
    validation::{OrderLine, PricedLine},
};

/// A cart line frozen at submission time. Name and price are for display;
/// only `id` and `quantity` are trusted by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItemSnapshot {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub quantity: i64,
}

impl OrderItemSnapshot {
    pub fn line(&self) -> OrderLine {
        OrderLine {
            id: self.id,
            quantity: self.quantity,
        }
    }
}

impl From<&PricedLine<'_>> for OrderItemSnapshot {
    fn from(line: &PricedLine<'_>) -> Self {
        Self {
            id: line.id,
            name: line.name.to_string(),
            price: line.unit_price,
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderSubmission {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub delivery_address: String,
    pub items: Vec<OrderItemSnapshot>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
}

impl OrderSubmission {
    pub fn lines(&self) -> Vec<OrderLine> {
        self.items.iter().map(OrderItemSnapshot::line).collect()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
