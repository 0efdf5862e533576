//! Product service: catalog CRUD plus the inventory ledger facade.
//!
//! The ledger operations (`reserve`/`unreserve`/`ship`) come in two shapes:
//! transaction-scoped methods the order lifecycle composes into its own
//! transactions, and standalone facade methods that open and commit a
//! transaction of their own.

use std::sync::Arc;

use chrono::Utc;

use orderflow_core::{DomainError, EntityKind, ProductId};
use orderflow_products::Product;
use orderflow_store::{Store, StoreTx};

use crate::error::ServiceResult;

pub struct ProductService {
    store: Arc<dyn Store>,
}

impl ProductService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Look up an active product; deactivated products read as not found.
    pub fn get_product(&self, product_id: ProductId) -> ServiceResult<Product> {
        Ok(self
            .store
            .get_product(product_id)?
            .ok_or(DomainError::not_found(EntityKind::Product, product_id))?)
    }

    /// Active products matching `search` against name or SKU.
    pub fn list_products(&self, search: &str) -> ServiceResult<Vec<Product>> {
        Ok(self.store.list_products(search)?)
    }

    pub fn add_product(
        &self,
        sku: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit_price: u64,
        available_quantity: u32,
    ) -> ServiceResult<Product> {
        let product = Product::new(
            ProductId::new(),
            sku,
            name,
            description,
            unit_price,
            available_quantity,
            Utc::now(),
        );
        self.store.add_product(&product)?;
        tracing::info!(product_id = %product.id_typed(), sku = product.sku(), "product added");
        Ok(product)
    }

    pub fn update_product(
        &self,
        product_id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit_price: u64,
        available_quantity: u32,
    ) -> ServiceResult<Product> {
        let mut product = self.get_product(product_id)?;
        product.update_details(
            sku,
            name,
            description,
            unit_price,
            available_quantity,
            Utc::now(),
        );
        self.store.update_product(&product)?;
        Ok(product)
    }

    /// Soft delete: the product stops being visible to lookups and
    /// reservations; existing order items keep referring to it.
    pub fn deactivate_product(&self, product_id: ProductId) -> ServiceResult<()> {
        let mut product = self.get_product(product_id)?;
        product.deactivate(Utc::now());
        self.store.update_product(&product)?;
        tracing::info!(product_id = %product_id, "product deactivated");
        Ok(())
    }

    /// Reserve `quantity` units within an open transaction.
    ///
    /// Returns the monetary amount for the reserved units at the product's
    /// current unit price; the caller captures it into the order item.
    pub fn reserve(
        &self,
        tx: &mut dyn StoreTx,
        product_id: ProductId,
        quantity: u32,
    ) -> ServiceResult<u64> {
        let mut product = tx
            .get_product(product_id)?
            .ok_or(DomainError::not_found(EntityKind::Product, product_id))?;
        let amount = product.reserve(quantity)?;
        tx.update_product(&product)?;
        tracing::info!(product_id = %product_id, quantity, amount, "stock reserved");
        Ok(amount)
    }

    /// Unreserve `quantity` units within an open transaction. Never fails on
    /// over-unreserve; the reserved quantity floors at zero.
    pub fn unreserve(
        &self,
        tx: &mut dyn StoreTx,
        product_id: ProductId,
        quantity: u32,
    ) -> ServiceResult<u64> {
        let mut product = tx
            .get_product(product_id)?
            .ok_or(DomainError::not_found(EntityKind::Product, product_id))?;
        let amount = product.unreserve(quantity);
        tx.update_product(&product)?;
        tracing::info!(product_id = %product_id, quantity, amount, "stock unreserved");
        Ok(amount)
    }

    /// Remove `quantity` reserved units from the warehouse within an open
    /// transaction (the stock leaves permanently).
    pub fn ship(
        &self,
        tx: &mut dyn StoreTx,
        product_id: ProductId,
        quantity: u32,
    ) -> ServiceResult<()> {
        let mut product = tx
            .get_product(product_id)?
            .ok_or(DomainError::not_found(EntityKind::Product, product_id))?;
        product.ship(quantity);
        tx.update_product(&product)?;
        tracing::info!(product_id = %product_id, quantity, "stock shipped");
        Ok(())
    }

    /// Standalone facade over [`ProductService::reserve`].
    pub fn reserve_product(&self, product_id: ProductId, quantity: u32) -> ServiceResult<u64> {
        let mut tx = self.store.begin()?;
        let amount = self.reserve(tx.as_mut(), product_id, quantity)?;
        tx.commit()?;
        Ok(amount)
    }

    /// Standalone facade over [`ProductService::unreserve`].
    pub fn unreserve_product(&self, product_id: ProductId, quantity: u32) -> ServiceResult<u64> {
        let mut tx = self.store.begin()?;
        let amount = self.unreserve(tx.as_mut(), product_id, quantity)?;
        tx.commit()?;
        Ok(amount)
    }

    /// Standalone facade over [`ProductService::ship`].
    pub fn ship_product(&self, product_id: ProductId, quantity: u32) -> ServiceResult<()> {
        let mut tx = self.store.begin()?;
        self.ship(tx.as_mut(), product_id, quantity)?;
        tx.commit()?;
        Ok(())
    }
}
