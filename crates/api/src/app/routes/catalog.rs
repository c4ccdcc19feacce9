//! Customer-facing catalog reads. These responses never include
//! `cost_price`.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use shopfront_core::{ProductId, VariantId};
use shopfront_infra::store::CatalogStore;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id/variants", get(list_product_variants))
        .route("/variants/:id/stock", get(variant_stock))
}

/// Active products with at least one variant, newest first.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::CategoryQuery>,
) -> axum::response::Response {
    match services.store().list_active_products(query.filter()).await {
        Ok(products) => {
            let items = products.iter().map(dto::product_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// In-stock variants of a product.
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

    match services.store().list_variants_in_stock(product_id).await {
        Ok(variants) => {
            let items = variants
                .iter()
                .map(dto::variant_to_customer_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Spot check of a variant's live stock level.
pub async fn variant_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let variant_id: VariantId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid variant id")
        }
    };

    match services.store().get_variant(variant_id).await {
        Ok(Some(variant)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": variant.id.to_string(),
                "color": variant.color,
                "stock_quantity": variant.stock_quantity,
            })),
        )
            .into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "variant not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
