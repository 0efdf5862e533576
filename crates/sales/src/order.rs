use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderflow_core::{CustomerId, Entity, OrderId, OrderItemId, ProductId};

/// Sales order status lifecycle.
///
/// Happy path is `Draft → Paid → Shipped → Delivered`; `Cancelled` is an
/// alternate terminal state reachable only from `Draft`. No transition
/// leaves `Delivered` or `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Draft,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

/// The actions an order can be subjected to; each has its own validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    ChangeInOrderItems,
    Pay,
    Ship,
    Deliver,
    Cancel,
}

impl OrderAction {
    pub const ALL: [OrderAction; 5] = [
        OrderAction::ChangeInOrderItems,
        OrderAction::Pay,
        OrderAction::Ship,
        OrderAction::Deliver,
        OrderAction::Cancel,
    ];
}

/// Shipping address; optional until the order is paid (the Pay validator
/// enforces completeness).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl ShippingAddress {
    /// All four fields present and non-empty.
    pub fn is_complete(&self) -> bool {
        [
            &self.street_address,
            &self.postal_code,
            &self.city,
            &self.country,
        ]
        .iter()
        .all(|field| field.as_deref().is_some_and(|s| !s.is_empty()))
    }
}

/// Line item owned by an order.
///
/// `amount` is captured at reservation time (quantity × unit price as it was
/// then) and owned exclusively by the item; it is never recomputed from the
/// current product price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    quantity: u32,
    amount: u64,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl OrderItem {
    pub fn new(
        id: OrderItemId,
        order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
        amount: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_id,
            product_id,
            quantity,
            amount,
            created_at,
            updated_at: None,
        }
    }

    pub fn id_typed(&self) -> OrderItemId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Grow the item to `quantity`, attributing `amount_delta` for the newly
    /// reserved units.
    pub fn increase(&mut self, quantity: u32, amount_delta: u64, updated_at: DateTime<Utc>) {
        self.quantity = quantity;
        self.amount += amount_delta;
        self.updated_at = Some(updated_at);
    }

    /// Shrink the item to `quantity`, releasing `amount_delta` for the
    /// unreserved units.
    pub fn decrease(&mut self, quantity: u32, amount_delta: u64, updated_at: DateTime<Utc>) {
        self.quantity = quantity;
        self.amount = self.amount.saturating_sub(amount_delta);
        self.updated_at = Some(updated_at);
    }
}

impl Entity for OrderItem {
    type Id = OrderItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Sales order aggregate.
///
/// `total_amount` is derived: it always equals the sum of the item amounts,
/// maintained by the lifecycle manager as items are reserved and released.
/// `items` is populated only by with-items loads; plain loads leave it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_number: String,
    customer_id: CustomerId,
    currency_code: String,
    total_amount: u64,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    payment_date: Option<DateTime<Utc>>,
    shipped_date: Option<DateTime<Utc>>,
    delivered_date: Option<DateTime<Utc>>,
    cancelled_date: Option<DateTime<Utc>>,
    shipping_address: ShippingAddress,
    #[serde(default)]
    items: Vec<OrderItem>,
}

impl Order {
    /// Create a new `Draft` order with a zero total and a timestamp-derived
    /// order number (unique per 10µs; acceptable for single-node use).
    pub fn new(
        id: OrderId,
        customer_id: CustomerId,
        currency_code: impl Into<String>,
        shipping_address: ShippingAddress,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_number: Self::order_number_for(created_at),
            customer_id,
            currency_code: currency_code.into(),
            total_amount: 0,
            status: OrderStatus::Draft,
            created_at,
            payment_date: None,
            shipped_date: None,
            delivered_date: None,
            cancelled_date: None,
            shipping_address,
            items: Vec::new(),
        }
    }

    fn order_number_for(created_at: DateTime<Utc>) -> String {
        format!(
            "{}{:05}",
            created_at.format("%Y%m%d%H%M%S"),
            created_at.timestamp_subsec_nanos() / 10_000
        )
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn payment_date(&self) -> Option<DateTime<Utc>> {
        self.payment_date
    }

    pub fn shipped_date(&self) -> Option<DateTime<Utc>> {
        self.shipped_date
    }

    pub fn delivered_date(&self) -> Option<DateTime<Utc>> {
        self.delivered_date
    }

    pub fn cancelled_date(&self) -> Option<DateTime<Utc>> {
        self.cancelled_date
    }

    pub fn shipping_address(&self) -> &ShippingAddress {
        &self.shipping_address
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Replace the shipping address (item mutation rules do not apply; the
    /// Pay validator is what enforces completeness).
    pub fn set_shipping_address(&mut self, shipping_address: ShippingAddress) {
        self.shipping_address = shipping_address;
    }

    /// Attach eagerly-loaded items (store concern).
    pub fn set_items(&mut self, items: Vec<OrderItem>) {
        self.items = items;
    }

    pub fn add_to_total(&mut self, amount: u64) {
        self.total_amount += amount;
    }

    pub fn subtract_from_total(&mut self, amount: u64) {
        self.total_amount = self.total_amount.saturating_sub(amount);
    }

    pub fn mark_paid(&mut self, at: DateTime<Utc>) {
        self.status = OrderStatus::Paid;
        self.payment_date = Some(at);
    }

    pub fn mark_shipped(&mut self, at: DateTime<Utc>) {
        self.status = OrderStatus::Shipped;
        self.shipped_date = Some(at);
    }

    pub fn mark_delivered(&mut self, at: DateTime<Utc>) {
        self.status = OrderStatus::Delivered;
        self.delivered_date = Some(at);
    }

    pub fn mark_cancelled(&mut self, at: DateTime<Utc>) {
        self.status = OrderStatus::Cancelled;
        self.cancelled_date = Some(at);
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
