use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    catalog::{Category, Product, ProductId},
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        functions::{
            FunctionErrorBody, OrderNotificationRequest, OrderNotificationResponse,
            ValidateOrderRequest, ValidateOrderResponse, ValidationFailure,
        },
        orders::{OrderItemSnapshot, OrderList, OrderSubmission},
        products::ProductList,
    },
    models::{Order, User},
    response::{ApiResponse, Meta},
    routes::{auth, functions, health, orders, params, products},
    validation::OrderLine,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        products::list_products,
        products::get_product,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        functions::validate_order,
        functions::send_order_notification
    ),
    components(
        schemas(
            User,
            Product,
            ProductId,
            Category,
            Order,
            OrderLine,
            OrderItemSnapshot,
            OrderSubmission,
            OrderList,
            ProductList,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ValidateOrderRequest,
            ValidateOrderResponse,
            ValidationFailure,
            OrderNotificationRequest,
            OrderNotificationResponse,
            FunctionErrorBody,
            params::Pagination,
            params::SortOrder,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<LoginResponse>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Orders", description = "Order persistence endpoints"),
        (name = "Functions", description = "Order validation and notification functions"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
