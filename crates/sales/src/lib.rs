//! Sales domain module.
//!
//! This crate contains business rules for sales orders: the order/item
//! entities, the status state machine, and the per-action validators. Pure
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod order;
pub mod validator;

pub use order::{Order, OrderAction, OrderItem, OrderStatus, ShippingAddress};
pub use validator::{OrderValidator, ValidatorRegistry};
