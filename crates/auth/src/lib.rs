//! Admin identities and credential checks.
//!
//! The storefront has a fixed, environment-configured set of dashboard
//! admins. There are no sessions or tokens; a successful login hands the
//! client its identity, and admin mutations carry that identity back in the
//! request body for audit stamping.

pub mod admin;

pub use admin::{AdminDirectory, AdminIdentity};
