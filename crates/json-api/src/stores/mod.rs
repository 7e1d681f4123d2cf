//! Public storefront routes

pub(crate) mod products;
