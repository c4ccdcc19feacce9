use axum::Router;

pub mod admin;
pub mod admin_catalog;
pub mod catalog;
pub mod orders;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .merge(catalog::router())
        .merge(orders::router())
        .nest("/admin", admin::router().merge(admin_catalog::router()))
}
