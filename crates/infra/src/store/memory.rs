use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use shopfront_catalog::{Product, Variant};
use shopfront_core::{OrderId, ProductId, VariantId};
use shopfront_inventory::{admit, restock, LedgerError, StockLedger};
use shopfront_orders::Order;

use super::{CatalogStore, OrderStore, StoreError};

/// In-memory document store for tests/dev.
///
/// One lock per collection. Ledger operations take the variants write lock
/// for the whole check+decrement, which is what makes `reserve` linearizable
/// per variant here.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: RwLock<HashMap<ProductId, Product>>,
    variants: RwLock<HashMap<VariantId, Variant>>,
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::backend("store lock poisoned")
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn put_product(&self, product: Product) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(|_| poisoned())?;
        products.insert(product.id, product);
        Ok(())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products.get(&id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(all)
    }

    async fn list_active_products(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Product>, StoreError> {
        let with_variants: std::collections::HashSet<ProductId> = {
            let variants = self.variants.read().map_err(|_| poisoned())?;
            variants.values().map(|v| v.product_id).collect()
        };

        let products = self.products.read().map_err(|_| poisoned())?;
        let mut active: Vec<Product> = products
            .values()
            .filter(|p| p.is_active)
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| with_variants.contains(&p.id))
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(active)
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut products = self.products.write().map_err(|_| poisoned())?;
        let existed = products.remove(&id).is_some();
        drop(products);

        // Cascade: a product owns its variants.
        let mut variants = self.variants.write().map_err(|_| poisoned())?;
        variants.retain(|_, v| v.product_id != id);
        Ok(existed)
    }

    async fn put_variant(&self, variant: Variant) -> Result<(), StoreError> {
        let mut variants = self.variants.write().map_err(|_| poisoned())?;
        variants.insert(variant.id, variant);
        Ok(())
    }

    async fn get_variant(&self, id: VariantId) -> Result<Option<Variant>, StoreError> {
        let variants = self.variants.read().map_err(|_| poisoned())?;
        Ok(variants.get(&id).cloned())
    }

    async fn list_variants(&self, product_id: ProductId) -> Result<Vec<Variant>, StoreError> {
        let variants = self.variants.read().map_err(|_| poisoned())?;
        let mut matching: Vec<Variant> = variants
            .values()
            .filter(|v| v.product_id == product_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.color.cmp(&b.color).then(a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn list_variants_in_stock(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Variant>, StoreError> {
        let mut matching = self.list_variants(product_id).await?;
        matching.retain(|v| v.in_stock());
        Ok(matching)
    }

    async fn list_all_variants(&self) -> Result<Vec<Variant>, StoreError> {
        let variants = self.variants.read().map_err(|_| poisoned())?;
        Ok(variants.values().cloned().collect())
    }

    async fn delete_variant(&self, id: VariantId) -> Result<bool, StoreError> {
        let mut variants = self.variants.write().map_err(|_| poisoned())?;
        Ok(variants.remove(&id).is_some())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn put_order(&self, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        orders.insert(order.id, order);
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.get(&id).cloned())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(all)
    }
}

#[async_trait]
impl StockLedger for InMemoryStore {
    async fn reserve(&self, variant_id: VariantId, quantity: i64) -> Result<Variant, LedgerError> {
        let mut variants = self
            .variants
            .write()
            .map_err(|_| LedgerError::Storage("store lock poisoned".to_string()))?;

        let variant = variants
            .get_mut(&variant_id)
            .ok_or(LedgerError::VariantNotFound)?;

        // Check and decrement under the same write lock.
        variant.stock_quantity = admit(variant.stock_quantity, quantity)?;
        variant.updated_at = Utc::now();
        Ok(variant.clone())
    }

    async fn release(&self, variant_id: VariantId, quantity: i64) -> Result<Variant, LedgerError> {
        let mut variants = self
            .variants
            .write()
            .map_err(|_| LedgerError::Storage("store lock poisoned".to_string()))?;

        let variant = variants
            .get_mut(&variant_id)
            .ok_or(LedgerError::VariantNotFound)?;

        variant.stock_quantity = restock(variant.stock_quantity, quantity)?;
        variant.updated_at = Utc::now();
        Ok(variant.clone())
    }
}
