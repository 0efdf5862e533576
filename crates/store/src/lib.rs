//! Persistence contracts for the order/inventory core, plus an in-memory
//! implementation.
//!
//! The core consumes two collaborator interfaces, [`OrderStore`] and
//! [`ProductStore`], and a transaction object ([`StoreTx`]) that makes
//! multi-step mutations atomic: dropping a transaction without committing
//! rolls every staged write back.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use r#trait::{OrderStore, ProductStore, Store, StoreError, StoreTx};
