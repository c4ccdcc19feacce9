//! Admin dashboard: login, order management, analytics.
//!
//! There is no session layer; a successful login hands the dashboard its
//! identity and mutations carry `admin_id`/`admin_name` back in the body for
//! audit stamping. Requests without an identity are stamped as an unknown
//! admin rather than rejected.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use shopfront_auth::AdminIdentity;
use shopfront_core::OrderId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/orders", get(list_orders))
        .route("/orders/:id", patch(update_order_status).delete(delete_order))
        .route("/analytics", get(analytics))
}

fn actor(admin_id: Option<String>, admin_name: Option<String>) -> AdminIdentity {
    AdminIdentity {
        id: admin_id.unwrap_or_else(|| "unknown".to_string()),
        name: admin_name.unwrap_or_else(|| "Unknown Admin".to_string()),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.admins().verify(&body.username, &body.password) {
        Some(identity) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "admin_id": identity.id,
                "admin_name": identity.name,
                "message": "Login successful",
            })),
        )
            .into_response(),
        None => {
            tracing::info!(username = %body.username, "admin login failed");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "success": false,
                    "message": "Invalid credentials",
                })),
            )
                .into_response()
        }
    }
}

/// Every order, newest first, enriched with variant pricing.
pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.orders_report().await {
        Ok(reports) => (StatusCode::OK, Json(reports)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_order_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateOrderStatusRequest>,
) -> axum::response::Response {
    let order_id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id")
        }
    };

    let actor = actor(body.admin_id, body.admin_name);
    match services
        .ordering()
        .transition_order(order_id, body.status, &actor)
        .await
    {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response(),
        Err(e) => errors::ordering_error_to_response(e),
    }
}

/// Only completed orders can be deleted; the order is restocked and kept as a
/// cancelled record with a `deleted_by` stamp.
pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Option<Json<dto::AdminActionRequest>>,
) -> axum::response::Response {
    let order_id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id")
        }
    };

    let body = body.map(|Json(b)| b).unwrap_or_default();
    let actor = actor(body.admin_id, body.admin_name);
    match services.ordering().delete_order(order_id, &actor).await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "Order deleted and stock restored",
            })),
        )
            .into_response(),
        Err(e) => errors::ordering_error_to_response(e),
    }
}

pub async fn analytics(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.analytics().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
