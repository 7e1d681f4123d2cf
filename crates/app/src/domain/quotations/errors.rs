//! Quotations service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{domain::tenants::errors::TenantsServiceError, render::RenderError};

#[derive(Debug, Error)]
pub enum QuotationsServiceError {
    #[error("quotation not found")]
    NotFound,

    #[error("cart is empty")]
    EmptyCart,

    #[error("customer name and phone are required")]
    MissingCustomerData,

    #[error("quotation was already converted")]
    AlreadyConverted,

    #[error("user may not manage this store")]
    Forbidden,

    #[error("quotation already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("tenant lookup failed")]
    Tenants(#[source] TenantsServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for QuotationsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
