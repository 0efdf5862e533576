//! Thin HTTP layer over the order/inventory services.

pub mod app;
