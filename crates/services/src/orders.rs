//! Order lifecycle manager.
//!
//! Receives an intent (add/update/remove item, pay, ship, deliver, cancel),
//! loads the order, runs the matching validator, performs any required
//! inventory movement through the product service, and persists the result.
//! Item mutations and shipping span several writes, so they run inside one
//! store transaction; an early exit drops the transaction and rolls back.

use std::sync::Arc;

use chrono::Utc;

use orderflow_core::{CustomerId, DomainError, EntityKind, OrderId, OrderItemId, ProductId};
use orderflow_sales::{Order, OrderAction, OrderItem, ShippingAddress, ValidatorRegistry};
use orderflow_store::Store;

use crate::error::ServiceResult;
use crate::products::ProductService;

pub struct OrdersService {
    store: Arc<dyn Store>,
    products: Arc<ProductService>,
    validators: ValidatorRegistry,
}

impl OrdersService {
    pub fn new(store: Arc<dyn Store>, products: Arc<ProductService>) -> Self {
        Self {
            store,
            products,
            validators: ValidatorRegistry::standard(),
        }
    }

    /// Create a `Draft` order. Always legal; no validator runs.
    pub fn add_order(
        &self,
        customer_id: CustomerId,
        currency_code: impl Into<String>,
        shipping_address: ShippingAddress,
    ) -> ServiceResult<Order> {
        let order = Order::new(
            OrderId::new(),
            customer_id,
            currency_code,
            shipping_address,
            Utc::now(),
        );
        self.store.add_order(&order)?;
        tracing::info!(
            order_id = %order.id_typed(),
            order_number = order.order_number(),
            "draft order created"
        );
        Ok(order)
    }

    /// Replace the shipping address of an existing order.
    pub fn update_order(
        &self,
        order_id: OrderId,
        shipping_address: ShippingAddress,
    ) -> ServiceResult<Order> {
        let mut order = self.require_order(order_id)?;
        order.set_shipping_address(shipping_address);
        self.store.update_order(&order)?;
        Ok(order)
    }

    pub fn get_order(&self, order_id: OrderId) -> ServiceResult<Order> {
        self.require_order(order_id)
    }

    pub fn get_order_with_items(&self, order_id: OrderId) -> ServiceResult<Order> {
        self.require_order_with_items(order_id)
    }

    /// Reserve stock for a product and add it to the order as a new item.
    ///
    /// The reservation, the item row and the order total update commit as
    /// one atomic unit; if the reservation fails nothing is persisted.
    pub fn add_order_item(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> ServiceResult<OrderItem> {
        let mut order = self.require_order_with_items(order_id)?;
        self.validators
            .validate(OrderAction::ChangeInOrderItems, &order)?;

        let mut tx = self.store.begin()?;
        let amount = self.products.reserve(tx.as_mut(), product_id, quantity)?;

        let item = OrderItem::new(
            OrderItemId::new(),
            order_id,
            product_id,
            quantity,
            amount,
            Utc::now(),
        );
        tx.add_order_item(&item)?;

        order.add_to_total(amount);
        tx.update_order(&order)?;
        tx.commit()?;

        tracing::info!(
            order_id = %order_id,
            order_item_id = %item.id_typed(),
            product_id = %product_id,
            quantity,
            amount,
            "order item added"
        );
        Ok(item)
    }

    /// Unreserve an item's full quantity and delete it from the order.
    pub fn remove_order_item(
        &self,
        order_id: OrderId,
        order_item_id: OrderItemId,
    ) -> ServiceResult<()> {
        let mut order = self.require_order(order_id)?;
        self.validators
            .validate(OrderAction::ChangeInOrderItems, &order)?;
        let item = self.require_order_item(order_item_id)?;

        let mut tx = self.store.begin()?;
        let amount = self
            .products
            .unreserve(tx.as_mut(), item.product_id(), item.quantity())?;

        tx.delete_order_item(&item)?;
        order.subtract_from_total(amount);
        tx.update_order(&order)?;
        tx.commit()?;

        tracing::info!(
            order_id = %order_id,
            order_item_id = %order_item_id,
            "order item removed"
        );
        Ok(())
    }

    /// Set an item's quantity, reserving or unreserving the difference.
    ///
    /// Zero delegates to [`OrdersService::remove_order_item`]. Setting the
    /// current quantity is a no-op and deliberately skips the validator.
    pub fn update_order_item(
        &self,
        order_id: OrderId,
        order_item_id: OrderItemId,
        quantity: u32,
    ) -> ServiceResult<()> {
        if quantity == 0 {
            return self.remove_order_item(order_id, order_item_id);
        }

        let mut order = self.require_order(order_id)?;
        let mut item = self.require_order_item(order_item_id)?;
        if item.quantity() == quantity {
            return Ok(());
        }

        self.validators
            .validate(OrderAction::ChangeInOrderItems, &order)?;

        let mut tx = self.store.begin()?;
        let now = Utc::now();
        if quantity < item.quantity() {
            let delta = item.quantity() - quantity;
            let amount = self
                .products
                .unreserve(tx.as_mut(), item.product_id(), delta)?;
            item.decrease(quantity, amount, now);
            order.subtract_from_total(amount);
        } else {
            let delta = quantity - item.quantity();
            let amount = self.products.reserve(tx.as_mut(), item.product_id(), delta)?;
            item.increase(quantity, amount, now);
            order.add_to_total(amount);
        }

        tx.update_order_item(&item)?;
        tx.update_order(&order)?;
        tx.commit()?;

        tracing::info!(
            order_id = %order_id,
            order_item_id = %order_item_id,
            quantity,
            "order item updated"
        );
        Ok(())
    }

    /// Mark the order as paid (payment itself is simulated).
    pub fn pay_order(&self, order_id: OrderId) -> ServiceResult<Order> {
        let mut order = self.require_order(order_id)?;
        self.validators.validate(OrderAction::Pay, &order)?;

        order.mark_paid(Utc::now());
        self.store.update_order(&order)?;
        tracing::info!(order_id = %order_id, "order paid");
        Ok(order)
    }

    /// Ship every item's product and mark the order shipped.
    ///
    /// All per-product updates plus the status change commit atomically; a
    /// failure on any item rolls back the products already shipped.
    pub fn ship_order(&self, order_id: OrderId) -> ServiceResult<Order> {
        let mut order = self.require_order_with_items(order_id)?;
        self.validators.validate(OrderAction::Ship, &order)?;

        let mut tx = self.store.begin()?;
        for item in order.items() {
            self.products
                .ship(tx.as_mut(), item.product_id(), item.quantity())?;
        }

        order.mark_shipped(Utc::now());
        tx.update_order(&order)?;
        tx.commit()?;

        tracing::info!(order_id = %order_id, "order shipped");
        Ok(order)
    }

    /// Mark the order as delivered.
    pub fn deliver_order(&self, order_id: OrderId) -> ServiceResult<Order> {
        let mut order = self.require_order(order_id)?;
        self.validators.validate(OrderAction::Deliver, &order)?;

        order.mark_delivered(Utc::now());
        self.store.update_order(&order)?;
        tracing::info!(order_id = %order_id, "order delivered");
        Ok(order)
    }

    /// Cancel a draft order.
    ///
    /// Reserved stock is NOT released back to available here; see DESIGN.md
    /// for the status of this behavior.
    pub fn cancel_order(&self, order_id: OrderId) -> ServiceResult<Order> {
        let mut order = self.require_order(order_id)?;
        self.validators.validate(OrderAction::Cancel, &order)?;

        order.mark_cancelled(Utc::now());
        self.store.update_order(&order)?;
        tracing::info!(order_id = %order_id, "order cancelled");
        Ok(order)
    }

    fn require_order(&self, order_id: OrderId) -> ServiceResult<Order> {
        Ok(self
            .store
            .get_order(order_id)?
            .ok_or(DomainError::not_found(EntityKind::Order, order_id))?)
    }

    fn require_order_with_items(&self, order_id: OrderId) -> ServiceResult<Order> {
        Ok(self
            .store
            .get_order_with_items(order_id)?
            .ok_or(DomainError::not_found(EntityKind::Order, order_id))?)
    }

    fn require_order_item(&self, order_item_id: OrderItemId) -> ServiceResult<OrderItem> {
        Ok(self
            .store
            .get_order_item(order_item_id)?
            .ok_or(DomainError::not_found(EntityKind::OrderItem, order_item_id))?)
    }
}
