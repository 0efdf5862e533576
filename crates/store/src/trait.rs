use thiserror::Error;

use orderflow_core::{OrderId, OrderItemId, ProductId};
use orderflow_products::Product;
use orderflow_sales::{Order, OrderItem};

/// Infrastructure-level store failure.
///
/// Domain conditions (not found, illegal transitions) are **not** store
/// errors; lookups return `Ok(None)` and the service layer decides.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,

    /// Backend-specific failure (connectivity, serialization, ...).
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Order persistence contract.
///
/// `update_order` is a full replace of the order's mutable fields. Item rows
/// are managed separately so that an order mutation and its item mutation
/// can be staged in one [`StoreTx`].
pub trait OrderStore: Send + Sync {
    /// Order without its items.
    fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Order with items eagerly loaded.
    fn get_order_with_items(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    fn add_order(&self, order: &Order) -> Result<(), StoreError>;

    fn update_order(&self, order: &Order) -> Result<(), StoreError>;

    fn get_order_item(&self, id: OrderItemId) -> Result<Option<OrderItem>, StoreError>;

    fn add_order_item(&self, item: &OrderItem) -> Result<(), StoreError>;

    fn update_order_item(&self, item: &OrderItem) -> Result<(), StoreError>;

    fn delete_order_item(&self, item: &OrderItem) -> Result<(), StoreError>;
}

/// Product persistence contract.
pub trait ProductStore: Send + Sync {
    /// Active products only; deactivated products read as absent.
    fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    fn add_product(&self, product: &Product) -> Result<(), StoreError>;

    fn update_product(&self, product: &Product) -> Result<(), StoreError>;

    /// Active products whose name or SKU contains `search` (case-insensitive);
    /// an empty string matches everything.
    fn list_products(&self, search: &str) -> Result<Vec<Product>, StoreError>;
}

/// A store transaction: the unit of recovery for multi-step mutations.
///
/// All writes staged through a transaction become visible to other callers
/// only after `commit`. Dropping the transaction without committing rolls
/// everything back; reads within the transaction see its own writes.
pub trait StoreTx {
    fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    fn get_order_item(&self, id: OrderItemId) -> Result<Option<OrderItem>, StoreError>;

    /// Active products only, read-your-writes.
    fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    fn update_order(&mut self, order: &Order) -> Result<(), StoreError>;

    fn add_order_item(&mut self, item: &OrderItem) -> Result<(), StoreError>;

    fn update_order_item(&mut self, item: &OrderItem) -> Result<(), StoreError>;

    fn delete_order_item(&mut self, item: &OrderItem) -> Result<(), StoreError>;

    fn update_product(&mut self, product: &Product) -> Result<(), StoreError>;

    /// Publish all staged writes.
    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Umbrella contract the service layer composes over.
pub trait Store: OrderStore + ProductStore {
    /// Open a transaction.
    ///
    /// Implementations must guarantee that no staged write becomes visible
    /// unless [`StoreTx::commit`] succeeds.
    fn begin(&self) -> Result<Box<dyn StoreTx + '_>, StoreError>;
}
