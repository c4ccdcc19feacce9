//! Document-store abstractions over the three collections
//! (products, variants, orders).
//!
//! The ledger operations (`reserve`/`release`, see `shopfront-inventory`)
//! are part of the store contract, never a read-then-write sequence on top
//! of it: every implementation must execute the stock check and decrement
//! as one conditional update.

use async_trait::async_trait;
use thiserror::Error;

use shopfront_catalog::{Product, Variant};
use shopfront_core::{ProductId, VariantId};
use shopfront_inventory::StockLedger;
use shopfront_orders::Order;

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::InMemoryStore;

/// Storage failure (connectivity, poisoned lock, backend error).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Product/variant collection operations.
///
/// Writes are whole-record puts (document-store style); reads are the exact
/// queries the storefront needs, so each backend can push filtering and
/// ordering down to its native query machinery.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn put_product(&self, product: Product) -> Result<(), StoreError>;
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
    /// All products, newest first.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
    /// Active products having at least one variant, newest first, optionally
    /// narrowed to a category.
    async fn list_active_products(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Product>, StoreError>;
    /// Delete a product and cascade-delete its variants. Returns whether the
    /// product existed.
    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError>;

    async fn put_variant(&self, variant: Variant) -> Result<(), StoreError>;
    async fn get_variant(&self, id: VariantId) -> Result<Option<Variant>, StoreError>;
    /// All variants of a product, sorted by color.
    async fn list_variants(&self, product_id: ProductId) -> Result<Vec<Variant>, StoreError>;
    /// Variants of a product with stock on hand, sorted by color.
    async fn list_variants_in_stock(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Variant>, StoreError>;
    /// Every variant in the store (reporting input).
    async fn list_all_variants(&self) -> Result<Vec<Variant>, StoreError>;
    /// Delete a single variant. Returns whether it existed.
    async fn delete_variant(&self, id: VariantId) -> Result<bool, StoreError>;
}

/// Order collection operations.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn put_order(&self, order: Order) -> Result<(), StoreError>;
    async fn get_order(&self, id: shopfront_core::OrderId) -> Result<Option<Order>, StoreError>;
    /// All orders, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;
}

#[async_trait]
impl<S> CatalogStore for std::sync::Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn put_product(&self, product: Product) -> Result<(), StoreError> {
        (**self).put_product(product).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get_product(id).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list_products().await
    }

    async fn list_active_products(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Product>, StoreError> {
        (**self).list_active_products(category).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        (**self).delete_product(id).await
    }

    async fn put_variant(&self, variant: Variant) -> Result<(), StoreError> {
        (**self).put_variant(variant).await
    }

    async fn get_variant(&self, id: VariantId) -> Result<Option<Variant>, StoreError> {
        (**self).get_variant(id).await
    }

    async fn list_variants(&self, product_id: ProductId) -> Result<Vec<Variant>, StoreError> {
        (**self).list_variants(product_id).await
    }

    async fn list_variants_in_stock(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Variant>, StoreError> {
        (**self).list_variants_in_stock(product_id).await
    }

    async fn list_all_variants(&self) -> Result<Vec<Variant>, StoreError> {
        (**self).list_all_variants().await
    }

    async fn delete_variant(&self, id: VariantId) -> Result<bool, StoreError> {
        (**self).delete_variant(id).await
    }
}

#[async_trait]
impl<S> OrderStore for std::sync::Arc<S>
where
    S: OrderStore + ?Sized,
{
    async fn put_order(&self, order: Order) -> Result<(), StoreError> {
        (**self).put_order(order).await
    }

    async fn get_order(&self, id: shopfront_core::OrderId) -> Result<Option<Order>, StoreError> {
        (**self).get_order(id).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        (**self).list_orders().await
    }
}

/// Runtime-selected storage backend: in-memory for dev and tests, Postgres
/// behind the `postgres` feature.
#[derive(Clone)]
pub enum StoreBackend {
    InMemory(std::sync::Arc<InMemoryStore>),
    #[cfg(feature = "postgres")]
    Postgres(std::sync::Arc<postgres::PostgresStore>),
}

macro_rules! dispatch {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            StoreBackend::InMemory($store) => $call,
            #[cfg(feature = "postgres")]
            StoreBackend::Postgres($store) => $call,
        }
    };
}

#[async_trait]
impl CatalogStore for StoreBackend {
    async fn put_product(&self, product: Product) -> Result<(), StoreError> {
        dispatch!(self, s => s.put_product(product).await)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        dispatch!(self, s => s.get_product(id).await)
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        dispatch!(self, s => s.list_products().await)
    }

    async fn list_active_products(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Product>, StoreError> {
        dispatch!(self, s => s.list_active_products(category).await)
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        dispatch!(self, s => s.delete_product(id).await)
    }

    async fn put_variant(&self, variant: Variant) -> Result<(), StoreError> {
        dispatch!(self, s => s.put_variant(variant).await)
    }

    async fn get_variant(&self, id: VariantId) -> Result<Option<Variant>, StoreError> {
        dispatch!(self, s => s.get_variant(id).await)
    }

    async fn list_variants(&self, product_id: ProductId) -> Result<Vec<Variant>, StoreError> {
        dispatch!(self, s => s.list_variants(product_id).await)
    }

    async fn list_variants_in_stock(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Variant>, StoreError> {
        dispatch!(self, s => s.list_variants_in_stock(product_id).await)
    }

    async fn list_all_variants(&self) -> Result<Vec<Variant>, StoreError> {
        dispatch!(self, s => s.list_all_variants().await)
    }

    async fn delete_variant(&self, id: VariantId) -> Result<bool, StoreError> {
        dispatch!(self, s => s.delete_variant(id).await)
    }
}

#[async_trait]
impl OrderStore for StoreBackend {
    async fn put_order(&self, order: Order) -> Result<(), StoreError> {
        dispatch!(self, s => s.put_order(order).await)
    }

    async fn get_order(&self, id: shopfront_core::OrderId) -> Result<Option<Order>, StoreError> {
        dispatch!(self, s => s.get_order(id).await)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        dispatch!(self, s => s.list_orders().await)
    }
}

#[async_trait]
impl StockLedger for StoreBackend {
    async fn reserve(
        &self,
        variant_id: VariantId,
        quantity: i64,
    ) -> Result<Variant, shopfront_inventory::LedgerError> {
        dispatch!(self, s => s.reserve(variant_id, quantity).await)
    }

    async fn release(
        &self,
        variant_id: VariantId,
        quantity: i64,
    ) -> Result<Variant, shopfront_inventory::LedgerError> {
        dispatch!(self, s => s.release(variant_id, quantity).await)
    }
}
