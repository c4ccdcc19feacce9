//! Customer order placement.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use shopfront_core::{ProductId, VariantId};
use shopfront_orders::NewOrder;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/orders", post(place_order))
}

/// Reserve stock and create the order snapshot in `pending`. On insufficient
/// stock the response carries the live available count.
pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::PlaceOrderRequest>,
) -> axum::response::Response {
    let variant_id: VariantId = match body.variant_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid variant id")
        }
    };
    let product_id: ProductId = match body.product_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    let new = NewOrder {
        variant_id,
        product_id,
        product_name: body.product_name,
        size: body.size,
        color: body.color,
        quantity: body.quantity,
        phone_number: body.phone_number,
        country: body.country,
    };

    match services.ordering().place_order(new).await {
        Ok(order) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "order_id": order.id.to_string(),
            })),
        )
            .into_response(),
        Err(e) => errors::ordering_error_to_response(e),
    }
}
