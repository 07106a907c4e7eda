//! In-memory shopping cart.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::{
    catalog::{Product, ProductId},
    dto::orders::OrderItemSnapshot,
    validation::OrderLine,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity must be greater than 0")]
    InvalidQuantity,

    #[error("quantity {0} is too large")]
    QuantityTooLarge(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Ordered line items, at most one per product.
///
/// Totals use the price captured with each product and are for display;
/// the server re-prices every order from its ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, id: ProductId) -> Option<u32> {
        self.position(id).map(|idx| self.lines[idx].quantity)
    }

    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        match self.position(product.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::QuantityTooLarge(
                        i64::from(line.quantity) + i64::from(quantity),
                    ))?;
            }
            None => self.lines.push(CartLineItem {
                product: product.clone(),
                quantity,
            }),
        }
        Ok(())
    }

    /// Set a line's quantity; zero or less removes it. Unknown ids are ignored.
    /// A quantity that does not fit a line is rejected and the cart is left as is.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> Result<(), CartError> {
        let Some(idx) = self.position(id) else {
            return Ok(());
        };
        if quantity <= 0 {
            self.lines.remove(idx);
            return Ok(());
        }
        self.lines[idx].quantity =
            u32::try_from(quantity).map_err(|_| CartError::QuantityTooLarge(quantity))?;
        Ok(())
    }

    pub fn remove_item(&mut self, id: ProductId) {
        self.lines.retain(|line| line.product.id != id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLineItem::subtotal).sum()
    }

    /// The (id, quantity) pairs the server trusts.
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|line| OrderLine {
                id: line.product.id,
                quantity: i64::from(line.quantity),
            })
            .collect()
    }

    pub fn snapshot(&self) -> Vec<OrderItemSnapshot> {
        self.lines
            .iter()
            .map(|line| OrderItemSnapshot {
                id: line.product.id,
                name: line.product.name.clone(),
                price: line.product.price,
                quantity: i64::from(line.quantity),
            })
            .collect()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.product.id == id)
    }
}
