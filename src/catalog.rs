//! Static product catalog and the price ledger derived from it.
//!
//! The same list backs the `/api/products` listing, the client cart and the
//! server-side order validator, so display prices and validated prices come
//! from one place.

use std::{fmt, sync::LazyLock};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Long,
    Short,
    Fringe,
    FullSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub image: String,
    pub category: Category,
}

static CATALOG: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        product(
            1,
            "Fringe Buubu Dress",
            "Elegant fringe buubu dress with modern styling",
            dec!(240.00),
            "/assets/products/fringe-buubu-1.jpg",
            Category::Fringe,
        ),
        product(
            2,
            "Short Buubu Dress",
            "Comfortable short buubu dress for everyday wear",
            dec!(150.00),
            "/assets/products/short-buubu.jpg",
            Category::Short,
        ),
        product(
            3,
            "Long Buubu Dress",
            "Classic long buubu dress with timeless elegance",
            dec!(180.00),
            "/assets/products/long-buubu-1.jpg",
            Category::Long,
        ),
        product(
            4,
            "Long Buubu Dress - Style 2",
            "Stylish long buubu dress with unique design",
            dec!(180.00),
            "/assets/products/long-buubu-2.jpg",
            Category::Long,
        ),
        product(
            5,
            "Fringe Buubu Dress - Premium",
            "Premium fringe buubu dress with enhanced details",
            dec!(250.00),
            "/assets/products/fringe-buubu-2.jpg",
            Category::Fringe,
        ),
        product(
            6,
            "Long Buubu Dress - Deluxe",
            "Deluxe long buubu dress for special occasions",
            dec!(200.00),
            "/assets/products/long-buubu-3.jpg",
            Category::Long,
        ),
    ]
});

fn product(
    id: u32,
    name: &str,
    description: &str,
    price: Decimal,
    image: &str,
    category: Category,
) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_string(),
        description: description.to_string(),
        price,
        image: image.to_string(),
        category,
    }
}

/// Every product offered by the store, in display order.
pub fn products() -> &'static [Product] {
    &CATALOG
}

pub fn find_product(id: ProductId) -> Option<&'static Product> {
    CATALOG.iter().find(|p| p.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Invalid product ID: {0}")]
    UnknownProduct(ProductId),
}

#[derive(Debug, Clone, Copy)]
pub struct LedgerEntry<'a> {
    pub id: ProductId,
    pub name: &'a str,
    pub price: Decimal,
}

/// Canonical unit prices keyed by product id.
///
/// Prices handed in by callers are never consulted; only ids go in.
#[derive(Debug, Clone, Copy)]
pub struct PriceLedger<'a> {
    products: &'a [Product],
}

impl PriceLedger<'static> {
    pub fn canonical() -> Self {
        Self { products: products() }
    }
}

impl<'a> PriceLedger<'a> {
    pub fn new(products: &'a [Product]) -> Self {
        Self { products }
    }

    pub fn entry(&self, id: ProductId) -> Result<LedgerEntry<'a>, LedgerError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .map(|p| LedgerEntry {
                id: p.id,
                name: p.name.as_str(),
                price: p.price,
            })
            .ok_or(LedgerError::UnknownProduct(id))
    }

    pub fn price_of(&self, id: ProductId) -> Result<Decimal, LedgerError> {
        self.entry(id).map(|e| e.price)
    }
}
