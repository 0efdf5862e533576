//! Application services: the order lifecycle manager and the inventory
//! ledger facade.
//!
//! Services compose the pure domain crates with the store contracts; every
//! multi-step mutation runs inside one store transaction so that a failure
//! partway leaves no partial state behind.

pub mod error;
pub mod orders;
pub mod products;

pub use error::{ServiceError, ServiceResult};
pub use orders::OrdersService;
pub use products::ProductService;
