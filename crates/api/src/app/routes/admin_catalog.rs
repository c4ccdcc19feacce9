//! Admin catalog management: product and variant CRUD.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;

use shopfront_catalog::{NewProduct, NewVariant, Product, ProductUpdate, Variant};
use shopfront_core::{ProductId, VariantId};
use shopfront_infra::store::CatalogStore;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", patch(update_product).delete(delete_product))
        .route("/products/:id/variants", get(list_product_variants))
        .route("/variants", post(create_variant))
        .route("/variants/:id", axum::routing::delete(delete_variant))
        .route("/variants/:id/stock", patch(set_variant_stock))
}

/// All products, active or not, newest first.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().list_products().await {
        Ok(products) => {
            let items = products.iter().map(dto::product_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let now = Utc::now();

    let product = match Product::create(
        ProductId::new(),
        NewProduct {
            name: body.name,
            description: body.description,
            category: body.category,
            image_url: body.image_url,
            available_sizes: body.available_sizes,
            is_active: body.is_active.unwrap_or(true),
        },
        now,
    ) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let product_id = product.id;
    if let Err(e) = services.store().put_product(product).await {
        return errors::store_error_to_response(e);
    }

    // Optional first variant created alongside the product.
    if let Some(fv) = body.first_variant {
        let variant = match Variant::create(
            VariantId::new(),
            NewVariant {
                product_id,
                color: fv.color,
                available_sizes: fv.available_sizes,
                cost_price: fv.cost_price,
                selling_price: fv.selling_price,
                stock_quantity: fv.stock_quantity.unwrap_or(10),
                image_url: fv.image_url,
            },
            now,
        ) {
            Ok(v) => v,
            Err(e) => return errors::domain_error_to_response(e),
        };
        if let Err(e) = services.store().put_variant(variant).await {
            return errors::store_error_to_response(e);
        }
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "product_id": product_id.to_string(),
        })),
    )
        .into_response()
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    let mut product = match services.store().get_product(product_id).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found")
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    let update = ProductUpdate {
        name: body.name,
        description: body.description,
        category: body.category,
        image_url: body.image_url,
        available_sizes: body.available_sizes,
        is_active: body.is_active,
    };
    if let Err(e) = product.apply_update(update, Utc::now()) {
        return errors::domain_error_to_response(e);
    }

    match services.store().put_product(product).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Delete a product and cascade-delete its variants.
pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    match services.store().delete_product(product_id).await {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// All variants of a product, including `cost_price`.
pub async fn list_product_variants(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    match services.store().list_variants(product_id).await {
        Ok(variants) => {
            let items = variants
                .iter()
                .map(dto::variant_to_admin_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_variant(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateVariantRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match body.product_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    // Variants belong to exactly one product; refuse orphans.
    match services.store().get_product(product_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found")
        }
        Err(e) => return errors::store_error_to_response(e),
    }

    let variant = match Variant::create(
        VariantId::new(),
        NewVariant {
            product_id,
            color: body.color,
            available_sizes: body.available_sizes,
            cost_price: body.cost_price,
            selling_price: body.selling_price,
            stock_quantity: body.stock_quantity,
            image_url: body.image_url,
        },
        Utc::now(),
    ) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let variant_id = variant.id;
    match services.store().put_variant(variant).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "variant_id": variant_id.to_string(),
            })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Absolute stock correction by an admin (distinct from the ledger's
/// reserve/release used by the order workflow).
pub async fn set_variant_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetStockRequest>,
) -> axum::response::Response {
    let variant_id: VariantId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid variant id")
        }
    };

    let mut variant = match services.store().get_variant(variant_id).await {
        Ok(Some(v)) => v,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "variant not found")
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = variant.set_stock(body.stock_quantity, Utc::now()) {
        return errors::domain_error_to_response(e);
    }

    match services.store().put_variant(variant).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_variant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let variant_id: VariantId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid variant id")
        }
    };

    match services.store().delete_variant(variant_id).await {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "variant not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
