use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use orderflow_core::{OrderId, OrderItemId, ProductId};
use orderflow_products::Product;
use orderflow_sales::{Order, OrderItem};

use super::r#trait::{OrderStore, ProductStore, Store, StoreError, StoreTx};

#[derive(Debug, Clone, Default)]
struct State {
    orders: HashMap<OrderId, Order>,
    order_items: HashMap<OrderItemId, OrderItem>,
    products: HashMap<ProductId, Product>,
}

impl State {
    fn order(&self, id: OrderId) -> Option<Order> {
        self.orders.get(&id).cloned()
    }

    fn order_with_items(&self, id: OrderId) -> Option<Order> {
        let mut order = self.orders.get(&id).cloned()?;
        let mut items: Vec<OrderItem> = self
            .order_items
            .values()
            .filter(|item| item.order_id() == id)
            .cloned()
            .collect();
        // UUIDv7 item ids are time-ordered, so this is insertion order.
        items.sort_by_key(|item| *item.id_typed().as_uuid());
        order.set_items(items);
        Some(order)
    }

    fn active_product(&self, id: ProductId) -> Option<Product> {
        self.products
            .get(&id)
            .filter(|product| product.is_active())
            .cloned()
    }

    fn store_order(&mut self, order: &Order) {
        // Items are persisted as separate rows; never embed them.
        let mut order = order.clone();
        order.set_items(Vec::new());
        self.orders.insert(order.id_typed(), order);
    }
}

/// In-memory store.
///
/// Intended for tests/dev. A transaction holds the state lock for its whole
/// lifetime, so writers are serialized (coarse pessimistic locking); a
/// relational implementation would rely on serializable transactions
/// instead.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl OrderStore for InMemoryStore {
    fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.lock()?.order(id))
    }

    fn get_order_with_items(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.lock()?.order_with_items(id))
    }

    fn add_order(&self, order: &Order) -> Result<(), StoreError> {
        self.lock()?.store_order(order);
        Ok(())
    }

    fn update_order(&self, order: &Order) -> Result<(), StoreError> {
        self.lock()?.store_order(order);
        Ok(())
    }

    fn get_order_item(&self, id: OrderItemId) -> Result<Option<OrderItem>, StoreError> {
        Ok(self.lock()?.order_items.get(&id).cloned())
    }

    fn add_order_item(&self, item: &OrderItem) -> Result<(), StoreError> {
        self.lock()?
            .order_items
            .insert(item.id_typed(), item.clone());
        Ok(())
    }

    fn update_order_item(&self, item: &OrderItem) -> Result<(), StoreError> {
        self.lock()?
            .order_items
            .insert(item.id_typed(), item.clone());
        Ok(())
    }

    fn delete_order_item(&self, item: &OrderItem) -> Result<(), StoreError> {
        self.lock()?.order_items.remove(&item.id_typed());
        Ok(())
    }
}

impl ProductStore for InMemoryStore {
    fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.lock()?.active_product(id))
    }

    fn add_product(&self, product: &Product) -> Result<(), StoreError> {
        self.lock()?
            .products
            .insert(product.id_typed(), product.clone());
        Ok(())
    }

    fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        self.lock()?
            .products
            .insert(product.id_typed(), product.clone());
        Ok(())
    }

    fn list_products(&self, search: &str) -> Result<Vec<Product>, StoreError> {
        let needle = search.to_lowercase();
        let state = self.lock()?;
        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|product| product.is_active())
            .filter(|product| {
                needle.is_empty()
                    || product.name().to_lowercase().contains(&needle)
                    || product.sku().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        products.sort_by_key(|product| *product.id_typed().as_uuid());
        Ok(products)
    }
}

impl Store for InMemoryStore {
    fn begin(&self) -> Result<Box<dyn StoreTx + '_>, StoreError> {
        let guard = self.lock()?;
        let snapshot = guard.clone();
        Ok(Box::new(InMemoryTx {
            guard,
            snapshot,
            committed: false,
        }))
    }
}

/// Transaction over [`InMemoryStore`].
///
/// Holds the state lock; mutates in place and restores a pre-transaction
/// snapshot on drop unless committed.
struct InMemoryTx<'a> {
    guard: MutexGuard<'a, State>,
    snapshot: State,
    committed: bool,
}

impl StoreTx for InMemoryTx<'_> {
    fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.guard.order(id))
    }

    fn get_order_item(&self, id: OrderItemId) -> Result<Option<OrderItem>, StoreError> {
        Ok(self.guard.order_items.get(&id).cloned())
    }

    fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.guard.active_product(id))
    }

    fn update_order(&mut self, order: &Order) -> Result<(), StoreError> {
        self.guard.store_order(order);
        Ok(())
    }

    fn add_order_item(&mut self, item: &OrderItem) -> Result<(), StoreError> {
        self.guard.order_items.insert(item.id_typed(), item.clone());
        Ok(())
    }

    fn update_order_item(&mut self, item: &OrderItem) -> Result<(), StoreError> {
        self.guard.order_items.insert(item.id_typed(), item.clone());
        Ok(())
    }

    fn delete_order_item(&mut self, item: &OrderItem) -> Result<(), StoreError> {
        self.guard.order_items.remove(&item.id_typed());
        Ok(())
    }

    fn update_product(&mut self, product: &Product) -> Result<(), StoreError> {
        self.guard
            .products
            .insert(product.id_typed(), product.clone());
        Ok(())
    }

    fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        self.committed = true;
        Ok(())
    }
}

impl Drop for InMemoryTx<'_> {
    fn drop(&mut self) {
        if !self.committed {
            *self.guard = std::mem::take(&mut self.snapshot);
        }
    }
}
