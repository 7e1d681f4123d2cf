//! Products
//!
//! Store catalogs. Every read and write is scoped to one tenant; the
//! public storefront view reaches the same rows through the store slug.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use service::*;
