use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, UserSummary},
        orders::{CreateOrderRequest, OrderDocument},
    },
    models::{CartLineItem, Customer, Payment, PaymentMethod, PaymentStatus, Product},
    response::{ApiResponse, ErrorBody, SuccessFlag},
    routes::{auth, health, orders, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        orders::list_orders,
        orders::create_order,
        orders::delete_order,
        products::list_products,
        products::get_product
    ),
    components(
        schemas(
            Product,
            CartLineItem,
            Customer,
            Payment,
            PaymentMethod,
            PaymentStatus,
            LoginRequest,
            LoginResponse,
            UserSummary,
            CreateOrderRequest,
            OrderDocument,
            ErrorBody,
            SuccessFlag,
            ApiResponse<Product>,
            ApiResponse<Vec<Product>>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Login endpoint"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Products", description = "Catalog endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
