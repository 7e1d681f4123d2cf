//! Respond To Quotation Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use feria_app::domain::quotations::{
    data::{QuotationResponse, ResponseArtifact, ResponseFormat, ResponseLine},
    records::QuotationUuid,
};

use crate::{extensions::*, quotations::errors::into_status_error, state::State};

/// Respond To Quotation Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RespondRequest {
    pub quotation_id: Uuid,
    pub items: Vec<ResponseItemPayload>,

    #[serde(default)]
    pub notes: Option<String>,

    /// Offer validity window in days from now.
    pub valid_until: u32,

    /// Either `whatsapp` or `pdf`.
    pub format: String,
}

/// Adjusted line as store staff submit it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResponseItemPayload {
    pub name: String,

    /// Unit price as quoted, in minor currency units.
    pub original_price: u64,

    /// Unit price offered by staff, in minor currency units.
    pub adjusted_price: u64,

    pub quantity: u32,
}

impl From<ResponseItemPayload> for ResponseLine {
    fn from(payload: ResponseItemPayload) -> Self {
        ResponseLine {
            name: payload.name,
            original_price: payload.original_price,
            adjusted_price: payload.adjusted_price,
            quantity: payload.quantity,
        }
    }
}

/// Respond To Quotation Response
///
/// Shape depends on the requested format.
#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub(crate) enum RespondResponse {
    /// Deep link opening a prefilled WhatsApp conversation.
    #[serde(rename_all = "camelCase")]
    Whatsapp { whatsapp_url: String },

    /// Base64-encoded PDF and the filename to save it under.
    #[serde(rename_all = "camelCase")]
    Pdf { pdf_base64: String, filename: String },
}

impl From<ResponseArtifact> for RespondResponse {
    fn from(artifact: ResponseArtifact) -> Self {
        match artifact {
            ResponseArtifact::Whatsapp { url } => Self::Whatsapp { whatsapp_url: url },
            ResponseArtifact::Pdf { base64, filename } => Self::Pdf {
                pdf_base64: base64,
                filename,
            },
        }
    }
}

/// Respond To Quotation Handler
///
/// Builds the customer-facing artifact for a staff response and marks
/// the quotation contacted.
#[endpoint(
    tags("quotations"),
    summary = "Answer a quotation with adjusted prices",
    responses(
        (status_code = StatusCode::OK, description = "Artifact produced"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown response format"),
        (status_code = StatusCode::NOT_FOUND, description = "Quotation not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RespondRequest>,
    depot: &mut Depot,
) -> Result<Json<RespondResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = json.into_inner();

    let format = request
        .format
        .parse::<ResponseFormat>()
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

    let response = QuotationResponse {
        quotation_uuid: QuotationUuid::from_uuid(request.quotation_id),
        lines: request.items.into_iter().map(Into::into).collect(),
        notes: request.notes,
        valid_days: request.valid_until,
        format,
    };

    let artifact = state
        .app
        .quotations
        .respond(response)
        .await
        .map_err(into_status_error)?;

    Ok(Json(artifact.into()))
}
