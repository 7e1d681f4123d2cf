//! Carts
//!
//! A cart belongs to the browsing session, not to Postgres. The store
//! keeps the working selection in memory and rewrites the full list
//! through a [`CartStorage`] backend on every mutation; nothing reaches
//! the server until the shopper requests quotations.

pub mod models;
pub mod storage;
pub mod store;

pub use storage::{CartStorage, CartStorageError, JsonFileCartStorage, MemoryCartStorage};
pub use store::{CART_STORAGE_KEY, CartStore, CartStoreError};
