//! Tenants
//!
//! Stores and their staff. A tenant is one seller's store: an owner,
//! optional staff members, and the slug the storefront lives under.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::TenantsServiceError;
pub use service::*;
