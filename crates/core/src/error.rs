//! Domain error model.
//!
//! Every domain error carries a stable code name (for clients), a human
//! message (via `Display`), and a taxonomy kind the API layer translates
//! into an HTTP status. All of these are deterministic business failures;
//! infrastructure concerns belong elsewhere.

use thiserror::Error;
use uuid::Uuid;

use crate::id::OrderId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// The kind of entity a lookup failed for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Order,
    OrderItem,
    Product,
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            EntityKind::Order => "Order",
            EntityKind::OrderItem => "OrderItem",
            EntityKind::Product => "Product",
        };
        f.write_str(name)
    }
}

/// Coarse taxonomy over the domain errors, used for HTTP status mapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidTransition,
    PreconditionFailed,
    ResourceExhausted,
    Validation,
}

/// Domain-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A requested entity does not exist (or is no longer active).
    #[error("{entity} id {id} not found")]
    NotFound { entity: EntityKind, id: Uuid },

    /// Any action was attempted on an already cancelled order.
    #[error("order {order_id} is already cancelled")]
    OrderAlreadyCancelled { order_id: OrderId },

    /// The order already left `Draft`; item changes, payment and
    /// cancellation are no longer allowed.
    #[error("order {order_id} is already paid")]
    OrderAlreadyPaid { order_id: OrderId },

    /// Shipping was attempted on an order that already shipped (or later).
    #[error("order {order_id} is already shipped")]
    OrderAlreadyShipped { order_id: OrderId },

    /// Delivery was attempted on an already delivered order.
    #[error("order {order_id} is already delivered")]
    OrderAlreadyDelivered { order_id: OrderId },

    /// Shipping was attempted before payment.
    #[error("cannot ship unpaid order {order_id}")]
    OrderNotPaid { order_id: OrderId },

    /// Delivery was attempted before shipment.
    #[error("cannot deliver unshipped order {order_id}")]
    OrderNotShipped { order_id: OrderId },

    /// Payment was attempted on an order with no items.
    #[error("no order items exist in order {order_id} to make payment")]
    NoOrderItemAvailableToPay { order_id: OrderId },

    /// Shipping was attempted on an order with no items.
    #[error("no order items exist in order {order_id} for shipping")]
    NoOrderItemAvailableToShip { order_id: OrderId },

    /// Payment was attempted without a complete shipping address.
    #[error("shipping address missing for order {order_id}")]
    ShippingAddressMissing { order_id: OrderId },

    /// A reservation asked for more stock than is available.
    #[error(
        "requested product quantity not available: requested {requested}, available {available}"
    )]
    ProductQuantityNotAvailable { requested: u32, available: u32 },

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn not_found(entity: EntityKind, id: impl Into<Uuid>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Stable, externally-visible code name for this error.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound { entity, .. } => match entity {
                EntityKind::Order => "OrderNotFound",
                EntityKind::OrderItem => "OrderItemNotFound",
                EntityKind::Product => "ProductNotFound",
            },
            DomainError::OrderAlreadyCancelled { .. } => "OrderAlreadyCancelled",
            DomainError::OrderAlreadyPaid { .. } => "OrderAlreadyPaid",
            DomainError::OrderAlreadyShipped { .. } => "OrderAlreadyShipped",
            DomainError::OrderAlreadyDelivered { .. } => "OrderAlreadyDelivered",
            DomainError::OrderNotPaid { .. } => "OrderNotPaid",
            DomainError::OrderNotShipped { .. } => "OrderNotShipped",
            DomainError::NoOrderItemAvailableToPay { .. } => "NoOrderItemAvailableToPay",
            DomainError::NoOrderItemAvailableToShip { .. } => "NoOrderItemAvailableToShip",
            DomainError::ShippingAddressMissing { .. } => "ShippingAddressMissing",
            DomainError::ProductQuantityNotAvailable { .. } => "ProductQuantityNotAvailable",
            DomainError::InvalidId(_) => "InvalidId",
        }
    }

    /// Taxonomy kind; every domain error is a client-side (4xx) failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::OrderAlreadyCancelled { .. }
            | DomainError::OrderAlreadyPaid { .. }
            | DomainError::OrderAlreadyShipped { .. }
            | DomainError::OrderAlreadyDelivered { .. }
            | DomainError::OrderNotPaid { .. }
            | DomainError::OrderNotShipped { .. } => ErrorKind::InvalidTransition,
            DomainError::NoOrderItemAvailableToPay { .. }
            | DomainError::NoOrderItemAvailableToShip { .. }
            | DomainError::ShippingAddressMissing { .. } => ErrorKind::PreconditionFailed,
            DomainError::ProductQuantityNotAvailable { .. } => ErrorKind::ResourceExhausted,
            DomainError::InvalidId(_) => ErrorKind::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_names() {
        let order_id = OrderId::new();
        assert_eq!(
            DomainError::OrderAlreadyPaid { order_id }.code(),
            "OrderAlreadyPaid"
        );
        assert_eq!(
            DomainError::not_found(EntityKind::Product, uuid::Uuid::now_v7()).code(),
            "ProductNotFound"
        );
        assert_eq!(
            DomainError::ProductQuantityNotAvailable {
                requested: 5,
                available: 2
            }
            .code(),
            "ProductQuantityNotAvailable"
        );
    }

    #[test]
    fn kinds_follow_the_taxonomy() {
        let order_id = OrderId::new();
        assert_eq!(
            DomainError::OrderNotPaid { order_id }.kind(),
            ErrorKind::InvalidTransition
        );
        assert_eq!(
            DomainError::ShippingAddressMissing { order_id }.kind(),
            ErrorKind::PreconditionFailed
        );
        assert_eq!(
            DomainError::ProductQuantityNotAvailable {
                requested: 1,
                available: 0
            }
            .kind(),
            ErrorKind::ResourceExhausted
        );
    }
}
