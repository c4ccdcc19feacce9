//! Postgres-backed document store.
//!
//! Row mapping is done by hand with `try_get` so a schema drift surfaces as
//! a backend error instead of a silent default. The ledger operations are
//! single conditional `UPDATE` statements: the `WHERE stock_quantity >= $n`
//! clause carries the same admission rule the in-memory store applies under
//! its lock, evaluated atomically by the database.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};

use shopfront_catalog::{Product, Variant};
use shopfront_core::{OrderId, ProductId, VariantId};
use shopfront_inventory::{LedgerError, StockLedger};
use shopfront_orders::{AuditStamp, Order, OrderStatus};

use super::{CatalogStore, OrderStore, StoreError};

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the three collections if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL,
                image_url TEXT,
                available_sizes JSONB NOT NULL DEFAULT '[]',
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS variants (
                id UUID PRIMARY KEY,
                product_id UUID NOT NULL,
                color TEXT NOT NULL,
                available_sizes JSONB NOT NULL DEFAULT '[]',
                cost_price BIGINT NOT NULL DEFAULT 0,
                selling_price BIGINT NOT NULL DEFAULT 0,
                stock_quantity BIGINT NOT NULL DEFAULT 0 CHECK (stock_quantity >= 0),
                image_url TEXT,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id UUID PRIMARY KEY,
                variant_id UUID NOT NULL,
                product_id UUID NOT NULL,
                product_name TEXT NOT NULL,
                size TEXT NOT NULL DEFAULT '',
                color TEXT NOT NULL DEFAULT '',
                quantity BIGINT NOT NULL,
                phone_number TEXT NOT NULL,
                country TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL,
                approved_by JSONB,
                deleted_by JSONB,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        StoreError::backend(value.to_string())
    }
}

fn ledger_backend(e: sqlx::Error) -> LedgerError {
    LedgerError::Storage(e.to_string())
}

fn decode(e: impl std::fmt::Display) -> StoreError {
    StoreError::backend(format!("row decode failed: {e}"))
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let sizes: serde_json::Value = row.try_get("available_sizes").map_err(decode)?;
    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        category: row.try_get("category").map_err(decode)?,
        image_url: row.try_get("image_url").map_err(decode)?,
        available_sizes: serde_json::from_value(sizes).map_err(decode)?,
        is_active: row.try_get("is_active").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}

fn variant_from_row(row: &PgRow) -> Result<Variant, StoreError> {
    let sizes: serde_json::Value = row.try_get("available_sizes").map_err(decode)?;
    let cost_price: i64 = row.try_get("cost_price").map_err(decode)?;
    let selling_price: i64 = row.try_get("selling_price").map_err(decode)?;
    Ok(Variant {
        id: VariantId::from_uuid(row.try_get("id").map_err(decode)?),
        product_id: ProductId::from_uuid(row.try_get("product_id").map_err(decode)?),
        color: row.try_get("color").map_err(decode)?,
        available_sizes: serde_json::from_value(sizes).map_err(decode)?,
        cost_price: cost_price.max(0) as u64,
        selling_price: selling_price.max(0) as u64,
        stock_quantity: row.try_get("stock_quantity").map_err(decode)?,
        image_url: row.try_get("image_url").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}

fn stamp_from_json(value: Option<serde_json::Value>) -> Result<Option<AuditStamp>, StoreError> {
    value
        .map(|v| serde_json::from_value(v).map_err(decode))
        .transpose()
}

fn order_from_row(row: &PgRow) -> Result<Order, StoreError> {
    let status: String = row.try_get("status").map_err(decode)?;
    Ok(Order {
        id: OrderId::from_uuid(row.try_get("id").map_err(decode)?),
        variant_id: VariantId::from_uuid(row.try_get("variant_id").map_err(decode)?),
        product_id: ProductId::from_uuid(row.try_get("product_id").map_err(decode)?),
        product_name: row.try_get("product_name").map_err(decode)?,
        size: row.try_get("size").map_err(decode)?,
        color: row.try_get("color").map_err(decode)?,
        quantity: row.try_get("quantity").map_err(decode)?,
        phone_number: row.try_get("phone_number").map_err(decode)?,
        country: row.try_get("country").map_err(decode)?,
        status: status.parse::<OrderStatus>().map_err(decode)?,
        approved_by: stamp_from_json(row.try_get("approved_by").map_err(decode)?)?,
        deleted_by: stamp_from_json(row.try_get("deleted_by").map_err(decode)?)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}

fn stamp_to_json(stamp: &Option<AuditStamp>) -> Result<Option<serde_json::Value>, StoreError> {
    stamp
        .as_ref()
        .map(|s| serde_json::to_value(s).map_err(decode))
        .transpose()
}

const VARIANT_COLUMNS: &str = "id, product_id, color, available_sizes, cost_price, \
     selling_price, stock_quantity, image_url, created_at, updated_at";

#[async_trait]
impl CatalogStore for PostgresStore {
    async fn put_product(&self, product: Product) -> Result<(), StoreError> {
        let sizes = serde_json::to_value(&product.available_sizes).map_err(decode)?;
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, category, image_url,
                                  available_sizes, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                category = EXCLUDED.category,
                image_url = EXCLUDED.image_url,
                available_sizes = EXCLUDED.available_sizes,
                is_active = EXCLUDED.is_active,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(&product.image_url)
        .bind(sizes)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(product_from_row).collect()
    }

    async fn list_active_products(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT p.* FROM products p
            WHERE p.is_active
              AND ($1::TEXT IS NULL OR p.category = $1)
              AND EXISTS (SELECT 1 FROM variants v WHERE v.product_id = p.id)
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(product_from_row).collect()
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        sqlx::query("DELETE FROM variants WHERE product_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn put_variant(&self, variant: Variant) -> Result<(), StoreError> {
        let sizes = serde_json::to_value(&variant.available_sizes).map_err(decode)?;
        sqlx::query(
            r#"
            INSERT INTO variants (id, product_id, color, available_sizes, cost_price,
                                  selling_price, stock_quantity, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                color = EXCLUDED.color,
                available_sizes = EXCLUDED.available_sizes,
                cost_price = EXCLUDED.cost_price,
                selling_price = EXCLUDED.selling_price,
                stock_quantity = EXCLUDED.stock_quantity,
                image_url = EXCLUDED.image_url,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(variant.id.as_uuid())
        .bind(variant.product_id.as_uuid())
        .bind(&variant.color)
        .bind(sizes)
        .bind(variant.cost_price as i64)
        .bind(variant.selling_price as i64)
        .bind(variant.stock_quantity)
        .bind(&variant.image_url)
        .bind(variant.created_at)
        .bind(variant.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_variant(&self, id: VariantId) -> Result<Option<Variant>, StoreError> {
        let row = sqlx::query("SELECT * FROM variants WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(variant_from_row).transpose()
    }

    async fn list_variants(&self, product_id: ProductId) -> Result<Vec<Variant>, StoreError> {
        let rows =
            sqlx::query("SELECT * FROM variants WHERE product_id = $1 ORDER BY color, id")
                .bind(product_id.as_uuid())
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(variant_from_row).collect()
    }

    async fn list_variants_in_stock(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Variant>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM variants WHERE product_id = $1 AND stock_quantity > 0 \
             ORDER BY color, id",
        )
        .bind(product_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(variant_from_row).collect()
    }

    async fn list_all_variants(&self) -> Result<Vec<Variant>, StoreError> {
        let rows = sqlx::query("SELECT * FROM variants")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(variant_from_row).collect()
    }

    async fn delete_variant(&self, id: VariantId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM variants WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderStore for PostgresStore {
    async fn put_order(&self, order: Order) -> Result<(), StoreError> {
        let approved_by = stamp_to_json(&order.approved_by)?;
        let deleted_by = stamp_to_json(&order.deleted_by)?;
        sqlx::query(
            r#"
            INSERT INTO orders (id, variant_id, product_id, product_name, size, color,
                                quantity, phone_number, country, status, approved_by,
                                deleted_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                approved_by = EXCLUDED.approved_by,
                deleted_by = EXCLUDED.deleted_by,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.variant_id.as_uuid())
        .bind(order.product_id.as_uuid())
        .bind(&order.product_name)
        .bind(&order.size)
        .bind(&order.color)
        .bind(order.quantity)
        .bind(&order.phone_number)
        .bind(&order.country)
        .bind(order.status.as_str())
        .bind(approved_by)
        .bind(deleted_by)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(order_from_row).transpose()
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query("SELECT * FROM orders ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(order_from_row).collect()
    }
}

#[async_trait]
impl StockLedger for PostgresStore {
    async fn reserve(&self, variant_id: VariantId, quantity: i64) -> Result<Variant, LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity);
        }

        // Check and decrement in one conditional UPDATE; no row means either
        // the variant is missing or the stock guard refused.
        let updated = sqlx::query(&format!(
            "UPDATE variants \
             SET stock_quantity = stock_quantity - $2, updated_at = $3 \
             WHERE id = $1 AND stock_quantity >= $2 \
             RETURNING {VARIANT_COLUMNS}"
        ))
        .bind(variant_id.as_uuid())
        .bind(quantity)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(ledger_backend)?;

        if let Some(row) = updated {
            return variant_from_row(&row).map_err(|e| LedgerError::Storage(e.to_string()));
        }

        let available: Option<i64> =
            sqlx::query_scalar("SELECT stock_quantity FROM variants WHERE id = $1")
                .bind(variant_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(ledger_backend)?;

        match available {
            Some(available) => Err(LedgerError::InsufficientStock { available }),
            None => Err(LedgerError::VariantNotFound),
        }
    }

    async fn release(&self, variant_id: VariantId, quantity: i64) -> Result<Variant, LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity);
        }

        let updated = sqlx::query(&format!(
            "UPDATE variants \
             SET stock_quantity = stock_quantity + $2, updated_at = $3 \
             WHERE id = $1 \
             RETURNING {VARIANT_COLUMNS}"
        ))
        .bind(variant_id.as_uuid())
        .bind(quantity)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(ledger_backend)?;

        match updated {
            Some(row) => variant_from_row(&row).map_err(|e| LedgerError::Storage(e.to_string())),
            None => Err(LedgerError::VariantNotFound),
        }
    }
}
