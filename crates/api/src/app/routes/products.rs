//! Product catalog routes.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use orderflow_core::ProductId;

use crate::app::dto::{
    CreateProductRequest, ListProductsQuery, ProductResponse, UpdateProductRequest,
};
use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/:id", get(get_product).put(update_product))
        .route("/:id/deactivate", post(deactivate_product))
}

fn parse_product_id(id: &str) -> Result<ProductId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
    })
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CreateProductRequest>,
) -> axum::response::Response {
    match services.products.add_product(
        body.sku,
        body.name,
        body.description,
        body.unit_price,
        body.available_quantity,
    ) {
        Ok(product) => (StatusCode::CREATED, Json(ProductResponse::from(&product))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.products.get_product(product_id) {
        Ok(product) => (StatusCode::OK, Json(ProductResponse::from(&product))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListProductsQuery>,
) -> axum::response::Response {
    match services.products.list_products(&query.search) {
        Ok(products) => {
            let items = products
                .iter()
                .map(ProductResponse::from)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> axum::response::Response {
    let product_id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.products.update_product(
        product_id,
        body.sku,
        body.name,
        body.description,
        body.unit_price,
        body.available_quantity,
    ) {
        Ok(product) => (StatusCode::OK, Json(ProductResponse::from(&product))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn deactivate_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.products.deactivate_product(product_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
