//! Infrastructure layer: document stores, the ordering workflow, reporting.

pub mod ordering;
pub mod reporting;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use ordering::{OrderingError, OrderingService};
pub use store::{CatalogStore, InMemoryStore, OrderStore, StoreBackend, StoreError};

#[cfg(feature = "postgres")]
pub use store::postgres::PostgresStore;
