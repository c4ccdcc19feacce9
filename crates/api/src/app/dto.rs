use serde::Deserialize;

use shopfront_catalog::{Product, Variant};
use shopfront_orders::OrderStatus;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub variant_id: String,
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub quantity: i64,
    pub phone_number: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    /// Closed enum: unknown status strings are rejected at deserialization.
    pub status: OrderStatus,
    pub admin_id: Option<String>,
    pub admin_name: Option<String>,
}

/// DELETE body: just the acting admin.
#[derive(Debug, Deserialize, Default)]
pub struct AdminActionRequest {
    pub admin_id: Option<String>,
    pub admin_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FirstVariantRequest {
    pub color: String,
    #[serde(default)]
    pub cost_price: u64,
    #[serde(default)]
    pub selling_price: u64,
    pub stock_quantity: Option<i64>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub available_sizes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub available_sizes: Vec<String>,
    pub is_active: Option<bool>,
    pub first_variant: Option<FirstVariantRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub available_sizes: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateVariantRequest {
    pub product_id: String,
    pub color: String,
    #[serde(default)]
    pub cost_price: u64,
    #[serde(default)]
    pub selling_price: u64,
    #[serde(default)]
    pub stock_quantity: i64,
    pub image_url: Option<String>,
    #[serde(default)]
    pub available_sizes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStockRequest {
    pub stock_quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

impl CategoryQuery {
    /// `category=all` means no filter, matching the storefront UI.
    pub fn filter(&self) -> Option<&str> {
        match self.category.as_deref() {
            None | Some("all") => None,
            Some(c) => Some(c),
        }
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": p.id.to_string(),
        "name": p.name,
        "description": p.description,
        "category": p.category,
        "image_url": p.image_url,
        "available_sizes": p.available_sizes,
        "is_active": p.is_active,
        "created_at": p.created_at,
        "updated_at": p.updated_at,
    })
}

/// Customer-facing view: `cost_price` is deliberately absent.
pub fn variant_to_customer_json(v: &Variant) -> serde_json::Value {
    serde_json::json!({
        "id": v.id.to_string(),
        "product_id": v.product_id.to_string(),
        "color": v.color,
        "available_sizes": v.available_sizes,
        "selling_price": v.selling_price,
        "stock_quantity": v.stock_quantity,
        "image_url": v.image_url,
    })
}

/// Admin view: includes `cost_price`.
pub fn variant_to_admin_json(v: &Variant) -> serde_json::Value {
    serde_json::json!({
        "id": v.id.to_string(),
        "product_id": v.product_id.to_string(),
        "color": v.color,
        "available_sizes": v.available_sizes,
        "cost_price": v.cost_price,
        "selling_price": v.selling_price,
        "stock_quantity": v.stock_quantity,
        "image_url": v.image_url,
        "created_at": v.created_at,
        "updated_at": v.updated_at,
    })
}
