//! Document Rendering
//!
//! Customer-facing quotation PDFs are produced by an external rendering
//! service. This module holds the document shape that service accepts
//! and the HTTP client that talks to it.

pub mod document;
pub mod errors;
pub mod service;

pub use document::{DocumentLine, QuotationDocument};
pub use errors::RenderError;
pub use service::*;
