//! Order lifecycle routes.
//!
//! Item mutation endpoints and the pay/ship/deliver/cancel transitions all
//! funnel through `OrdersService`, so the HTTP layer stays a thin mapping
//! between JSON and domain types.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use orderflow_core::{CustomerId, OrderId, OrderItemId, ProductId};

use crate::app::dto::{
    self, AddOrderItemRequest, CreateOrderRequest, OrderItemResponse, OrderResponse,
    UpdateOrderItemRequest, UpdateOrderRequest,
};
use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order))
        .route("/:id", get(get_order).put(update_order))
        .route("/:id/items", post(add_order_item))
        .route(
            "/:id/items/:item_id",
            put(update_order_item).delete(remove_order_item),
        )
        .route("/:id/pay", post(pay_order))
        .route("/:id/ship", post(ship_order))
        .route("/:id/deliver", post(deliver_order))
        .route("/:id/cancel", post(cancel_order))
}

fn parse_order_id(id: &str) -> Result<OrderId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id")
    })
}

fn parse_order_item_id(id: &str) -> Result<OrderItemId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order item id")
    })
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CreateOrderRequest>,
) -> axum::response::Response {
    let address = dto::shipping_address(
        body.street_address,
        body.postal_code,
        body.city,
        body.country,
    );
    match services.orders.add_order(
        CustomerId::from_uuid(body.customer_id),
        body.currency_code,
        address,
    ) {
        Ok(order) => (StatusCode::CREATED, Json(OrderResponse::from(&order))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.orders.get_order_with_items(order_id) {
        Ok(order) => (StatusCode::OK, Json(OrderResponse::from(&order))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateOrderRequest>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let address = dto::shipping_address(
        body.street_address,
        body.postal_code,
        body.city,
        body.country,
    );
    match services.orders.update_order(order_id, address) {
        Ok(order) => (StatusCode::OK, Json(OrderResponse::from(&order))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn add_order_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<AddOrderItemRequest>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.orders.add_order_item(
        order_id,
        ProductId::from_uuid(body.product_id),
        body.quantity,
    ) {
        Ok(item) => (StatusCode::CREATED, Json(OrderItemResponse::from(&item))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_order_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, item_id)): Path<(String, String)>,
    Json(body): Json<UpdateOrderItemRequest>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let order_item_id = match parse_order_item_id(&item_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services
        .orders
        .update_order_item(order_id, order_item_id, body.quantity)
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn remove_order_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, item_id)): Path<(String, String)>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let order_item_id = match parse_order_item_id(&item_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.orders.remove_order_item(order_id, order_item_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn pay_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.orders.pay_order(order_id) {
        Ok(order) => (StatusCode::OK, Json(OrderResponse::from(&order))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn ship_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.orders.ship_order(order_id) {
        Ok(order) => (StatusCode::OK, Json(OrderResponse::from(&order))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn deliver_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.orders.deliver_order(order_id) {
        Ok(order) => (StatusCode::OK, Json(OrderResponse::from(&order))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn cancel_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.orders.cancel_order(order_id) {
        Ok(order) => (StatusCode::OK, Json(OrderResponse::from(&order))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
