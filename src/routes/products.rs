use axum::{
    Json, Router,
    extract::{Path, Query},
    routing::get,
};

use crate::{
    catalog::{Product, ProductId},
    dto::products::{ProductList, ProductQuery},
    error::AppResult,
    response::ApiResponse,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("category" = Option<String>, Query, description = "One of long, short, fringe, full-set"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(Query(query): Query<ProductQuery>) -> Json<ApiResponse<ProductList>> {
    Json(product_service::list_products(&query))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = u32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(Path(id): Path<u32>) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::get_product(ProductId(id))?;
    Ok(Json(resp))
}
