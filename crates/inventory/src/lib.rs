//! Inventory ledger: race-safe stock accounting per variant.
//!
//! The admission rule (`admit`/`restock`) is pure and lives here so the
//! overselling guard is testable without a store. Implementations of
//! [`StockLedger`] must execute check+decrement as one indivisible step
//! against their backing store.

pub mod ledger;

pub use ledger::{admit, restock, LedgerError, StockLedger};
