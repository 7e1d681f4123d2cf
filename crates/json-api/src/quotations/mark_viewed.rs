//! Mark Quotations Viewed Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, quotations::errors::into_status_error, state::State};

/// Mark Viewed Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MarkViewedResponse {
    pub success: bool,
}

/// Mark Quotations Viewed Handler
///
/// Stamps every pending, unseen quotation of the caller's store.
/// Repeat calls are no-ops.
#[endpoint(
    tags("quotations"),
    summary = "Mark the store's pending quotations as seen",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Pending quotations stamped"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::NOT_FOUND, description = "Caller has no store"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<MarkViewedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    state
        .app
        .quotations
        .mark_viewed(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(MarkViewedResponse { success: true }))
}
