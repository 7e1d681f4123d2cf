//! Quotations

pub(crate) mod convert;
pub(crate) mod create;
pub(crate) mod errors;
pub(crate) mod mark_viewed;
pub(crate) mod respond;
