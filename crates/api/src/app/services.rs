use std::sync::Arc;

use orderflow_services::{OrdersService, ProductService};
use orderflow_store::InMemoryStore;

/// Service container shared by all handlers.
pub struct AppServices {
    pub orders: OrdersService,
    pub products: Arc<ProductService>,
}

/// Wire the services over a fresh in-memory store.
pub fn build_services() -> AppServices {
    let store = Arc::new(InMemoryStore::new());
    let products = Arc::new(ProductService::new(store.clone()));
    let orders = OrdersService::new(store, products.clone());

    AppServices { orders, products }
}
