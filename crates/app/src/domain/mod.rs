//! Feria Domain Concerns

pub mod carts;
pub mod orders;
pub mod products;
pub mod quotations;
pub mod tenants;
