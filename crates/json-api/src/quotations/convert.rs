//! Convert Quotation Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use feria_app::domain::quotations::records::QuotationUuid;

use crate::{extensions::*, quotations::errors::into_status_error, state::State};

/// Convert Quotation Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConvertRequest {
    pub quotation_id: Uuid,
}

/// Convert Quotation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConvertResponse {
    pub success: bool,
    pub order_id: Uuid,
    pub message: String,
}

/// Convert Quotation Handler
///
/// Turns an accepted quotation into a confirmed, paid order for the
/// store that owns it.
#[endpoint(
    tags("quotations"),
    summary = "Convert a quotation into an order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Quotation was already converted"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller may not manage the store"),
        (status_code = StatusCode::NOT_FOUND, description = "Quotation not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ConvertRequest>,
    depot: &mut Depot,
) -> Result<Json<ConvertResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let quotation = QuotationUuid::from_uuid(json.into_inner().quotation_id);

    let order = state
        .app
        .quotations
        .convert(user, quotation)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ConvertResponse {
        success: true,
        order_id: order.uuid.into_uuid(),
        message: format!("Cotización convertida en pedido {}", order.ticket),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use feria_app::domain::{
        orders::records::OrderUuid,
        quotations::{MockQuotationsService, QuotationsServiceError},
    };

    use crate::test_helpers::{TEST_USER_UUID, make_order, quotations_service};

    use super::*;

    fn make_service(quotations: MockQuotationsService) -> Service {
        quotations_service(
            quotations,
            Router::with_path("quotations/convert").post(handler),
        )
    }

    fn convert_body(quotation: Uuid) -> serde_json::Value {
        json!({ "quotationId": quotation })
    }

    #[tokio::test]
    async fn test_convert_returns_the_new_order() -> TestResult {
        let quotation = QuotationUuid::new();
        let order_uuid = OrderUuid::new();
        let order = make_order(order_uuid);
        let ticket = order.ticket.clone();

        let mut quotations = MockQuotationsService::new();

        quotations
            .expect_convert()
            .once()
            .withf(move |user, requested| {
                *user == TEST_USER_UUID && *requested == quotation
            })
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::post("http://example.com/quotations/convert")
            .json(&convert_body(quotation.into_uuid()))
            .send(&make_service(quotations))
            .await;

        let body: ConvertResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success);
        assert_eq!(body.order_id, order_uuid.into_uuid());
        assert!(
            body.message.contains(&ticket),
            "message should name the order ticket: {}",
            body.message
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_convert_twice_returns_400() -> TestResult {
        let mut quotations = MockQuotationsService::new();

        quotations
            .expect_convert()
            .once()
            .return_once(|_, _| Err(QuotationsServiceError::AlreadyConverted));

        let res = TestClient::post("http://example.com/quotations/convert")
            .json(&convert_body(Uuid::nil()))
            .send(&make_service(quotations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_convert_without_store_access_returns_403() -> TestResult {
        let mut quotations = MockQuotationsService::new();

        quotations
            .expect_convert()
            .once()
            .return_once(|_, _| Err(QuotationsServiceError::Forbidden));

        let res = TestClient::post("http://example.com/quotations/convert")
            .json(&convert_body(Uuid::nil()))
            .send(&make_service(quotations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_convert_unknown_quotation_returns_404() -> TestResult {
        let mut quotations = MockQuotationsService::new();

        quotations
            .expect_convert()
            .once()
            .return_once(|_, _| Err(QuotationsServiceError::NotFound));

        let res = TestClient::post("http://example.com/quotations/convert")
            .json(&convert_body(Uuid::nil()))
            .send(&make_service(quotations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
