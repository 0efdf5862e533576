//! Per-action order validators.
//!
//! Each [`OrderAction`] has exactly one validator. A shared pre-check
//! rejects any action on an already-cancelled order; the per-action rule
//! runs after it. Validators are pure checks: no side effects, no
//! persistence. Success is `Ok(())`, any failure is a specific domain error.

use orderflow_core::{DomainError, DomainResult};

use crate::order::{Order, OrderAction, OrderStatus};

/// Validation capability shared by all per-action rule sets.
pub trait OrderValidator: Send + Sync {
    /// The action this validator gates.
    fn action(&self) -> OrderAction;

    /// Per-action rule; runs after the shared cancelled pre-check.
    fn check(&self, order: &Order) -> DomainResult<()>;

    /// Shared pre-check composed with the per-action rule.
    fn validate(&self, order: &Order) -> DomainResult<()> {
        if order.status() == OrderStatus::Cancelled {
            return Err(DomainError::OrderAlreadyCancelled {
                order_id: order.id_typed(),
            });
        }
        self.check(order)
    }
}

/// Gates add/update/remove of order items: only `Draft` orders are mutable.
pub struct ChangeInOrderItemsValidator;

impl OrderValidator for ChangeInOrderItemsValidator {
    fn action(&self) -> OrderAction {
        OrderAction::ChangeInOrderItems
    }

    fn check(&self, order: &Order) -> DomainResult<()> {
        if order.status() != OrderStatus::Draft {
            return Err(DomainError::OrderAlreadyPaid {
                order_id: order.id_typed(),
            });
        }
        Ok(())
    }
}

/// Gates payment: requires items, `Draft` status and a complete shipping
/// address, checked in that order.
pub struct PayOrderValidator;

impl OrderValidator for PayOrderValidator {
    fn action(&self) -> OrderAction {
        OrderAction::Pay
    }

    fn check(&self, order: &Order) -> DomainResult<()> {
        if order.total_amount() == 0 {
            return Err(DomainError::NoOrderItemAvailableToPay {
                order_id: order.id_typed(),
            });
        }
        if order.status() != OrderStatus::Draft {
            return Err(DomainError::OrderAlreadyPaid {
                order_id: order.id_typed(),
            });
        }
        if !order.shipping_address().is_complete() {
            return Err(DomainError::ShippingAddressMissing {
                order_id: order.id_typed(),
            });
        }
        Ok(())
    }
}

/// Gates shipment: requires items and `Paid` status.
pub struct ShipOrderValidator;

impl OrderValidator for ShipOrderValidator {
    fn action(&self) -> OrderAction {
        OrderAction::Ship
    }

    fn check(&self, order: &Order) -> DomainResult<()> {
        if order.total_amount() == 0 {
            return Err(DomainError::NoOrderItemAvailableToShip {
                order_id: order.id_typed(),
            });
        }
        if order.status() != OrderStatus::Paid {
            return Err(if order.status() == OrderStatus::Draft {
                DomainError::OrderNotPaid {
                    order_id: order.id_typed(),
                }
            } else {
                DomainError::OrderAlreadyShipped {
                    order_id: order.id_typed(),
                }
            });
        }
        Ok(())
    }
}

/// Gates delivery: requires `Shipped` status.
pub struct DeliverOrderValidator;

impl OrderValidator for DeliverOrderValidator {
    fn action(&self) -> OrderAction {
        OrderAction::Deliver
    }

    fn check(&self, order: &Order) -> DomainResult<()> {
        if order.status() != OrderStatus::Shipped {
            return Err(
                if matches!(order.status(), OrderStatus::Draft | OrderStatus::Paid) {
                    DomainError::OrderNotShipped {
                        order_id: order.id_typed(),
                    }
                } else {
                    DomainError::OrderAlreadyDelivered {
                        order_id: order.id_typed(),
                    }
                },
            );
        }
        Ok(())
    }
}

/// Gates cancellation: only `Draft` orders can be cancelled.
pub struct CancelOrderValidator;

impl OrderValidator for CancelOrderValidator {
    fn action(&self) -> OrderAction {
        OrderAction::Cancel
    }

    fn check(&self, order: &Order) -> DomainResult<()> {
        if order.status() != OrderStatus::Draft {
            return Err(DomainError::OrderAlreadyPaid {
                order_id: order.id_typed(),
            });
        }
        Ok(())
    }
}

/// Fixed mapping from [`OrderAction`] to its validator, built once at
/// startup.
///
/// A missing entry is a configuration fault of the process, not a runtime
/// condition, so construction panics unless every action is covered.
pub struct ValidatorRegistry {
    validators: Vec<Box<dyn OrderValidator>>,
}

impl ValidatorRegistry {
    /// Build a registry, asserting full action coverage.
    pub fn new(validators: Vec<Box<dyn OrderValidator>>) -> Self {
        for action in OrderAction::ALL {
            assert!(
                validators.iter().any(|v| v.action() == action),
                "no validator registered for {action:?}"
            );
        }
        Self { validators }
    }

    /// The standard registry with the five per-action validators.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(ChangeInOrderItemsValidator),
            Box::new(PayOrderValidator),
            Box::new(ShipOrderValidator),
            Box::new(DeliverOrderValidator),
            Box::new(CancelOrderValidator),
        ])
    }

    pub fn for_action(&self, action: OrderAction) -> &dyn OrderValidator {
        self.validators
            .iter()
            .find(|v| v.action() == action)
            .map(|v| v.as_ref())
            .expect("validator coverage is checked at construction")
    }

    /// Run the validator for `action` against `order`.
    pub fn validate(&self, action: OrderAction, order: &Order) -> DomainResult<()> {
        self.for_action(action).validate(order)
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
