//! Order lifecycle domain module.
//!
//! This crate contains the order record and its status state machine,
//! implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage). Transitions are *planned* here and *applied* by the
//! ordering workflow in `shopfront-infra`, which is also responsible for
//! executing the planned stock effect through the ledger.

pub mod order;

pub use order::{
    AuditStamp, NewOrder, Order, OrderStatus, StockEffect, TransitionError, TransitionOutcome,
};
