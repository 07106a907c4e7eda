use crate::{
    catalog::{self, Product, ProductId},
    dto::products::{ProductList, ProductQuery},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
};

pub fn list_products(query: &ProductQuery) -> ApiResponse<ProductList> {
    let window = query.pagination().window();
    let matching: Vec<&Product> = catalog::products()
        .iter()
        .filter(|p| query.category.is_none_or(|c| p.category == c))
        .collect();
    let total = matching.len() as i64;

    let items = matching
        .into_iter()
        .skip(window.offset as usize)
        .take(window.per_page as usize)
        .cloned()
        .collect();

    ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::for_window(window, total)),
    )
}

pub fn get_product(id: ProductId) -> AppResult<ApiResponse<Product>> {
    let product = catalog::find_product(id).ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product.clone(), None))
}
