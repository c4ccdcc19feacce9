use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shopfront_core::DomainError;
use shopfront_infra::store::StoreError;
use shopfront_infra::OrderingError;
use shopfront_inventory::LedgerError;
use shopfront_orders::TransitionError;

pub fn ordering_error_to_response(err: OrderingError) -> axum::response::Response {
    match err {
        // Storefront contract: the client gets the live count so it can
        // adjust the requested quantity.
        OrderingError::Ledger(LedgerError::InsufficientStock { available }) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "success": false,
                "error": "Insufficient stock",
                "available": available,
            })),
        )
            .into_response(),
        OrderingError::Ledger(LedgerError::VariantNotFound) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "variant not found")
        }
        OrderingError::Ledger(LedgerError::InvalidQuantity) => json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "quantity must be positive",
        ),
        OrderingError::Ledger(LedgerError::Storage(_)) => storage_failure(),
        OrderingError::Domain(e) => domain_error_to_response(e),
        OrderingError::Transition(TransitionError::InvalidTransition { from, to }) => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_transition",
            format!("invalid transition: {from} -> {to}"),
        ),
        OrderingError::OrderNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "order not found")
        }
        OrderingError::DeleteNotAllowed { .. } => json_error(
            StatusCode::BAD_REQUEST,
            "delete_not_allowed",
            "only completed orders can be deleted",
        ),
        OrderingError::Store(_) => storage_failure(),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

pub fn store_error_to_response(_err: StoreError) -> axum::response::Response {
    storage_failure()
}

/// Storage/connectivity failures are surfaced with a generic retry message.
fn storage_failure() -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "store_error",
        "storage failure, try again",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
