//! Quotations
//!
//! The request-a-price flow. A shopper's cart is split by store into
//! pending quotations; staff answer with adjusted prices as a WhatsApp
//! link or a PDF, and an accepted quotation converts into an order.

pub mod data;
pub mod errors;
pub(crate) mod events;
pub mod records;
mod repository;
pub mod service;
mod tickets;
mod whatsapp;

pub use errors::QuotationsServiceError;
pub use service::*;
