//! Server-side order pricing against the canonical ledger.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::catalog::{LedgerError, PriceLedger, ProductId};

/// Largest absolute difference accepted between a submitted and a recomputed total.
pub const TOTAL_TOLERANCE: Decimal = dec!(0.01);

pub const MIN_LINE_QUANTITY: i64 = 1;
pub const MAX_LINE_QUANTITY: i64 = 100;

/// A product id and quantity as sent by an untrusted caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderValidationError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Invalid quantity for product {id}")]
    InvalidQuantity { id: ProductId, quantity: i64 },

    #[error("Order total out of range")]
    AmountOverflow,
}

/// One order line priced from the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine<'a> {
    pub id: ProductId,
    pub name: &'a str,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub calculated_total: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct OrderValidator<'a> {
    ledger: PriceLedger<'a>,
}

impl OrderValidator<'static> {
    pub fn canonical() -> Self {
        Self::new(PriceLedger::canonical())
    }
}

impl<'a> OrderValidator<'a> {
    pub fn new(ledger: PriceLedger<'a>) -> Self {
        Self { ledger }
    }

    /// Price every line of `items` from the ledger.
    ///
    /// Any unknown product or out-of-range quantity fails the whole order;
    /// nothing is skipped.
    pub fn price_lines(&self, items: &[OrderLine]) -> Result<Vec<PricedLine<'a>>, OrderValidationError> {
        items
            .iter()
            .map(|item| {
                let entry = self.ledger.entry(item.id)?;
                if !(MIN_LINE_QUANTITY..=MAX_LINE_QUANTITY).contains(&item.quantity) {
                    return Err(OrderValidationError::InvalidQuantity {
                        id: item.id,
                        quantity: item.quantity,
                    });
                }
                let amount = entry
                    .price
                    .checked_mul(Decimal::from(item.quantity))
                    .ok_or(OrderValidationError::AmountOverflow)?;
                Ok(PricedLine {
                    id: entry.id,
                    name: entry.name,
                    unit_price: entry.price,
                    quantity: item.quantity,
                    amount,
                })
            })
            .collect()
    }

    pub fn total_of(lines: &[PricedLine<'_>]) -> Result<Decimal, OrderValidationError> {
        lines.iter().try_fold(Decimal::ZERO, |acc, line| {
            acc.checked_add(line.amount)
                .ok_or(OrderValidationError::AmountOverflow)
        })
    }

    /// Recompute the total of `items` from the ledger.
    pub fn calculate_total(&self, items: &[OrderLine]) -> Result<Decimal, OrderValidationError> {
        Self::total_of(&self.price_lines(items)?)
    }

    pub fn validate(
        &self,
        items: &[OrderLine],
        submitted_total: Decimal,
    ) -> Result<ValidationReport, OrderValidationError> {
        let calculated_total = self.calculate_total(items)?;
        // A submitted total far enough out of range to overflow is a mismatch.
        let valid = calculated_total
            .checked_sub(submitted_total)
            .is_some_and(|diff| diff.abs() <= TOTAL_TOLERANCE);
        Ok(ValidationReport {
            valid,
            calculated_total,
        })
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}
