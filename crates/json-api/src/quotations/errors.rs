//! Quotation Errors

use salvo::http::StatusError;
use tracing::error;

use feria_app::domain::quotations::QuotationsServiceError;

pub(crate) fn into_status_error(error: QuotationsServiceError) -> StatusError {
    match error {
        QuotationsServiceError::NotFound => StatusError::not_found().brief("Quotation not found"),
        QuotationsServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        QuotationsServiceError::MissingCustomerData => {
            StatusError::bad_request().brief("Customer name and phone are required")
        }
        QuotationsServiceError::AlreadyConverted => {
            StatusError::bad_request().brief("Quotation was already converted")
        }
        QuotationsServiceError::Forbidden => {
            StatusError::forbidden().brief("User may not manage this store")
        }
        QuotationsServiceError::AlreadyExists
        | QuotationsServiceError::InvalidReference
        | QuotationsServiceError::MissingRequiredData
        | QuotationsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid quotation payload")
        }
        QuotationsServiceError::Render(source) => {
            error!("failed to render quotation document: {source}");

            StatusError::internal_server_error()
        }
        QuotationsServiceError::Tenants(source) => {
            error!("failed to resolve store during quotation flow: {source}");

            StatusError::internal_server_error()
        }
        QuotationsServiceError::Sql(source) => {
            error!("quotation storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
