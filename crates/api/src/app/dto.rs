use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use orderflow_products::Product;
use orderflow_sales::{Order, OrderItem, OrderStatus, ShippingAddress};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub currency_code: String,
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddOrderItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderItemRequest {
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unit_price: u64,
    pub available_quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unit_price: u64,
    pub available_quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    #[serde(default)]
    pub search: String,
}

pub fn shipping_address(
    street_address: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
    country: Option<String>,
) -> ShippingAddress {
    ShippingAddress {
        street_address,
        postal_code,
        city,
        country,
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    pub amount: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&OrderItem> for OrderItemResponse {
    fn from(item: &OrderItem) -> Self {
        Self {
            id: item.id_typed().into(),
            order_id: item.order_id().into(),
            product_id: item.product_id().into(),
            quantity: item.quantity(),
            amount: item.amount(),
            created_at: item.created_at(),
            updated_at: item.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub currency_code: String,
    pub total_amount: u64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
    pub shipped_date: Option<DateTime<Utc>>,
    pub delivered_date: Option<DateTime<Utc>>,
    pub cancelled_date: Option<DateTime<Utc>>,
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub items: Vec<OrderItemResponse>,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        let address = order.shipping_address();
        Self {
            id: order.id_typed().into(),
            order_number: order.order_number().to_string(),
            customer_id: order.customer_id().into(),
            currency_code: order.currency_code().to_string(),
            total_amount: order.total_amount(),
            status: order.status(),
            created_at: order.created_at(),
            payment_date: order.payment_date(),
            shipped_date: order.shipped_date(),
            delivered_date: order.delivered_date(),
            cancelled_date: order.cancelled_date(),
            street_address: address.street_address.clone(),
            postal_code: address.postal_code.clone(),
            city: address.city.clone(),
            country: address.country.clone(),
            items: order.items().iter().map(OrderItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub unit_price: u64,
    pub available_quantity: u32,
    pub reserved_quantity: u32,
    pub on_hand_quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id_typed().into(),
            sku: product.sku().to_string(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            unit_price: product.unit_price(),
            available_quantity: product.available_quantity(),
            reserved_quantity: product.reserved_quantity(),
            on_hand_quantity: product.on_hand_quantity(),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
        }
    }
}
