//! Catalog domain module.
//!
//! This crate contains the product/variant records of the storefront,
//! implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod product;
pub mod variant;

pub use product::{NewProduct, Product, ProductUpdate};
pub use variant::{NewVariant, Variant};
