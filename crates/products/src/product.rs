use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderflow_core::{DomainError, DomainResult, Entity, ProductId};

/// Catalog product with its warehouse quantities.
///
/// Quantity model:
/// - `available_quantity`: stock customers can still order.
/// - `reserved_quantity`: stock set aside for order items, still physically
///   in the warehouse.
/// - `on_hand_quantity()`: available + reserved; total physical stock.
///
/// Monetary values are in minor currency units (e.g. cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    sku: String,
    name: String,
    description: String,
    unit_price: u64,
    available_quantity: u32,
    reserved_quantity: u32,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Create a new active product with no reservations.
    pub fn new(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit_price: u64,
        available_quantity: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sku: sku.into(),
            name: name.into(),
            description: description.into(),
            unit_price,
            available_quantity,
            reserved_quantity: 0,
            active: true,
            created_at,
            updated_at: None,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn available_quantity(&self) -> u32 {
        self.available_quantity
    }

    pub fn reserved_quantity(&self) -> u32 {
        self.reserved_quantity
    }

    /// Total physical stock in the warehouse.
    pub fn on_hand_quantity(&self) -> u32 {
        self.available_quantity + self.reserved_quantity
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Move `quantity` units from available to reserved.
    ///
    /// Fails when more than the available quantity is requested, leaving the
    /// product untouched. Returns the monetary amount for the reserved units
    /// at the *current* unit price; the caller is responsible for capturing
    /// that amount so later price changes do not alter historical orders.
    pub fn reserve(&mut self, quantity: u32) -> DomainResult<u64> {
        if quantity > self.available_quantity {
            return Err(DomainError::ProductQuantityNotAvailable {
                requested: quantity,
                available: self.available_quantity,
            });
        }

        self.available_quantity -= quantity;
        self.reserved_quantity += quantity;
        Ok(self.amount_for(quantity))
    }

    /// Return `quantity` units from reserved back to available.
    ///
    /// Never fails: the reserved quantity floors at zero on over-unreserve.
    /// Returns the monetary amount for the units at the current unit price.
    pub fn unreserve(&mut self, quantity: u32) -> u64 {
        self.available_quantity += quantity;
        self.reserved_quantity = self.reserved_quantity.saturating_sub(quantity);
        self.amount_for(quantity)
    }

    /// Remove `quantity` units from reserved stock permanently.
    ///
    /// The stock physically leaves the warehouse, so the available quantity
    /// is untouched and the on-hand total shrinks. Floors at zero like
    /// [`Product::unreserve`].
    pub fn ship(&mut self, quantity: u32) {
        self.reserved_quantity = self.reserved_quantity.saturating_sub(quantity);
    }

    /// Replace the descriptive fields, price and available stock.
    pub fn update_details(
        &mut self,
        sku: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit_price: u64,
        available_quantity: u32,
        updated_at: DateTime<Utc>,
    ) {
        self.sku = sku.into();
        self.name = name.into();
        self.description = description.into();
        self.unit_price = unit_price;
        self.available_quantity = available_quantity;
        self.updated_at = Some(updated_at);
    }

    /// Soft delete: the product disappears from lookups but its row (and any
    /// reservations pointing at it) remain.
    pub fn deactivate(&mut self, updated_at: DateTime<Utc>) {
        self.active = false;
        self.updated_at = Some(updated_at);
    }

    fn amount_for(&self, quantity: u32) -> u64 {
        u64::from(quantity) * self.unit_price
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(unit_price: u64, available: u32) -> Product {
        Product::new(
            ProductId::new(),
            "SKU-1",
            "Widget",
            "A widget",
            unit_price,
            available,
            Utc::now(),
        )
    }

    #[test]
    fn reserve_moves_stock_and_returns_amount() {
        let mut product = test_product(500, 10);

        let amount = product.reserve(2).unwrap();

        assert_eq!(amount, 1000);
        assert_eq!(product.available_quantity(), 8);
        assert_eq!(product.reserved_quantity(), 2);
        assert_eq!(product.on_hand_quantity(), 10);
    }

    #[test]
    fn reserve_more_than_available_fails_and_leaves_product_unchanged() {
        let mut product = test_product(500, 3);

        let err = product.reserve(4).unwrap_err();

        match err {
            DomainError::ProductQuantityNotAvailable {
                requested,
                available,
            } => {
                assert_eq!(requested, 4);
                assert_eq!(available, 3);
            }
            other => panic!("expected ProductQuantityNotAvailable, got {other:?}"),
        }
        assert_eq!(product.available_quantity(), 3);
        assert_eq!(product.reserved_quantity(), 0);
    }

    #[test]
    fn unreserve_round_trips_quantities() {
        let mut product = test_product(250, 10);

        product.reserve(4).unwrap();
        let amount = product.unreserve(4);

        assert_eq!(amount, 1000);
        assert_eq!(product.available_quantity(), 10);
        assert_eq!(product.reserved_quantity(), 0);
    }

    #[test]
    fn over_unreserve_floors_reserved_at_zero() {
        let mut product = test_product(100, 10);

        product.reserve(2).unwrap();
        product.unreserve(5);

        assert_eq!(product.reserved_quantity(), 0);
        assert_eq!(product.available_quantity(), 13);
    }

    #[test]
    fn ship_reduces_reserved_but_not_available() {
        let mut product = test_product(100, 10);

        product.reserve(6).unwrap();
        product.ship(6);

        assert_eq!(product.available_quantity(), 4);
        assert_eq!(product.reserved_quantity(), 0);
        assert_eq!(product.on_hand_quantity(), 4);
    }

    #[test]
    fn over_ship_floors_reserved_at_zero() {
        let mut product = test_product(100, 10);

        product.reserve(1).unwrap();
        product.ship(3);

        assert_eq!(product.reserved_quantity(), 0);
        assert_eq!(product.available_quantity(), 9);
    }

    #[test]
    fn amount_uses_current_unit_price() {
        let mut product = test_product(500, 10);
        product.reserve(1).unwrap();

        // Price changes after the first reservation; the next movement is
        // priced at the new rate.
        product.update_details("SKU-1", "Widget", "A widget", 700, product.available_quantity(), Utc::now());

        assert_eq!(product.unreserve(1), 700);
    }

    #[test]
    fn deactivate_is_a_soft_delete() {
        let mut product = test_product(100, 1);
        assert!(product.is_active());

        product.deactivate(Utc::now());

        assert!(!product.is_active());
        assert_eq!(product.available_quantity(), 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: reserve followed by unreserve of the same quantity
            /// restores both quantities exactly.
            #[test]
            fn reserve_unreserve_round_trip(
                available in 0u32..10_000,
                quantity in 0u32..10_000,
                unit_price in 0u64..1_000_000,
            ) {
                let mut product = test_product(unit_price, available);

                if product.reserve(quantity).is_ok() {
                    product.unreserve(quantity);
                    prop_assert_eq!(product.available_quantity(), available);
                    prop_assert_eq!(product.reserved_quantity(), 0);
                }
            }

            /// Property: on-hand stock is conserved by reserve, and only
            /// shrinks through ship.
            #[test]
            fn on_hand_conserved_by_reserve(
                available in 0u32..10_000,
                quantity in 0u32..10_000,
            ) {
                let mut product = test_product(1, available);

                if product.reserve(quantity).is_ok() {
                    prop_assert_eq!(product.on_hand_quantity(), available);
                }
            }

            /// Property: arbitrary over-unreserve and over-ship never drive
            /// the reserved quantity negative (it clamps at zero).
            #[test]
            fn reserved_clamps_at_zero(
                available in 0u32..10_000,
                reserve_qty in 0u32..10_000,
                release_qty in 0u32..20_000,
                via_ship in proptest::bool::ANY,
            ) {
                let mut product = test_product(1, available);
                let _ = product.reserve(reserve_qty);

                if via_ship {
                    product.ship(release_qty);
                } else {
                    product.unreserve(release_qty);
                }

                prop_assert!(product.reserved_quantity() <= reserve_qty.min(available));
            }
        }
    }
}
