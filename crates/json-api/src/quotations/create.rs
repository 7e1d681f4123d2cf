//! Create Quotations Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use feria_app::domain::{
    carts::models::CartItem,
    products::records::ProductUuid,
    quotations::{data::CustomerContact, records::QuotationRecord},
    tenants::records::TenantUuid,
};

use crate::{extensions::*, quotations::errors::into_status_error, state::State};

/// Create Quotations Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateQuotationsRequest {
    pub items: Vec<CartItemPayload>,
    pub customer_data: CustomerDataPayload,
}

/// Cart line as the storefront posts it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemPayload {
    pub id: String,
    pub product_id: Uuid,

    /// Store the product belongs to; legacy carts may lack it.
    #[serde(default)]
    pub store_id: Option<Uuid>,

    pub name: String,

    /// Unit price in minor currency units.
    pub unit_price: u64,

    #[serde(default)]
    pub image: Option<String>,

    pub quantity: u32,

    #[serde(default)]
    pub size: Option<String>,

    #[serde(default)]
    pub color: Option<String>,
}

impl From<CartItemPayload> for CartItem {
    fn from(payload: CartItemPayload) -> Self {
        CartItem {
            id: payload.id,
            product_uuid: ProductUuid::from_uuid(payload.product_id),
            tenant_uuid: payload.store_id.map(TenantUuid::from_uuid),
            name: payload.name,
            unit_price: payload.unit_price,
            image: payload.image,
            quantity: payload.quantity,
            size: payload.size,
            color: payload.color,
        }
    }
}

/// Customer contact fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerDataPayload {
    pub name: String,
    pub phone: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub city: Option<String>,
}

impl From<CustomerDataPayload> for CustomerContact {
    fn from(payload: CustomerDataPayload) -> Self {
        CustomerContact {
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            city: payload.city,
        }
    }
}

/// Created Quotation Summary
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatedQuotation {
    pub quotation_id: Uuid,
    pub ticket: String,
    pub store_id: Uuid,
    pub total: u64,
}

impl From<&QuotationRecord> for CreatedQuotation {
    fn from(record: &QuotationRecord) -> Self {
        Self {
            quotation_id: record.uuid.into_uuid(),
            ticket: record.ticket.clone(),
            store_id: record.tenant_uuid.into_uuid(),
            total: record.total,
        }
    }
}

/// Create Quotations Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateQuotationsResponse {
    pub success: bool,
    pub quotations: Vec<CreatedQuotation>,
    pub message: String,
}

/// Create Quotations Handler
///
/// Groups the posted cart by store and opens one quotation per store.
#[endpoint(
    tags("quotations"),
    summary = "Request quotations for the carted items",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Quotations created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or incomplete customer data"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateQuotationsRequest>,
    depot: &mut Depot,
) -> Result<Json<CreateQuotationsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let request = json.into_inner();
    let items: Vec<CartItem> = request.items.into_iter().map(Into::into).collect();

    let quotations = state
        .app
        .quotations
        .create_from_cart(user, items, request.customer_data.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(CreateQuotationsResponse {
        success: true,
        message: creation_message(quotations.len()),
        quotations: quotations.iter().map(CreatedQuotation::from).collect(),
    }))
}

fn creation_message(count: usize) -> String {
    if count == 1 {
        "Se creó 1 cotización".to_string()
    } else {
        format!("Se crearon {count} cotizaciones")
    }
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use feria_app::domain::quotations::{
        MockQuotationsService, QuotationsServiceError, records::QuotationUuid,
    };

    use crate::test_helpers::{
        TEST_TENANT_UUID, TEST_USER_UUID, make_quotation, public_quotations_service,
        quotations_service,
    };

    use super::*;

    fn make_service(quotations: MockQuotationsService) -> Service {
        quotations_service(
            quotations,
            Router::with_path("quotations/create").post(handler),
        )
    }

    fn cart_body() -> serde_json::Value {
        json!({
            "items": [{
                "id": "item-1",
                "productId": Uuid::nil(),
                "storeId": TEST_TENANT_UUID.into_uuid(),
                "name": "Poncho de lana",
                "unitPrice": 12_500,
                "quantity": 1,
            }],
            "customerData": { "name": "María Quispe", "phone": "+56 9 1234 5678" },
        })
    }

    #[tokio::test]
    async fn test_create_passes_the_mapped_cart_to_the_service() -> TestResult {
        let quotation = make_quotation(QuotationUuid::new());
        let ticket = quotation.ticket.clone();

        let mut quotations = MockQuotationsService::new();

        quotations
            .expect_create_from_cart()
            .once()
            .withf(|user, items, contact| {
                let expected_item = CartItem {
                    id: "item-1".to_string(),
                    product_uuid: ProductUuid::from_uuid(Uuid::nil()),
                    tenant_uuid: Some(TEST_TENANT_UUID),
                    name: "Poncho de lana".to_string(),
                    unit_price: 12_500,
                    image: None,
                    quantity: 1,
                    size: None,
                    color: None,
                };

                *user == TEST_USER_UUID
                    && items == &[expected_item]
                    && contact.name == "María Quispe"
                    && contact.city.is_none()
            })
            .return_once(move |_, _, _| Ok(vec![quotation]));

        let mut res = TestClient::post("http://example.com/quotations/create")
            .json(&cart_body())
            .send(&make_service(quotations))
            .await;

        let body: CreateQuotationsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success);
        assert_eq!(body.message, "Se creó 1 cotización");
        assert_eq!(
            body.quotations.first().map(|q| q.ticket.clone()),
            Some(ticket)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_reports_one_summary_per_store() -> TestResult {
        let first = make_quotation(QuotationUuid::new());
        let second = make_quotation(QuotationUuid::new());
        let expected = vec![first.uuid.into_uuid(), second.uuid.into_uuid()];

        let mut quotations = MockQuotationsService::new();

        quotations
            .expect_create_from_cart()
            .once()
            .return_once(move |_, _, _| Ok(vec![first, second]));

        let mut res = TestClient::post("http://example.com/quotations/create")
            .json(&cart_body())
            .send(&make_service(quotations))
            .await;

        let body: CreateQuotationsResponse = res.take_json().await?;

        let ids: Vec<Uuid> = body
            .quotations
            .iter()
            .map(|quotation| quotation.quotation_id)
            .collect();

        assert_eq!(ids, expected);
        assert_eq!(body.message, "Se crearon 2 cotizaciones");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_with_an_empty_cart_returns_400() -> TestResult {
        let mut quotations = MockQuotationsService::new();

        quotations
            .expect_create_from_cart()
            .once()
            .return_once(|_, _, _| Err(QuotationsServiceError::EmptyCart));

        let res = TestClient::post("http://example.com/quotations/create")
            .json(&json!({
                "items": [],
                "customerData": { "name": "María Quispe", "phone": "+56 9 1234 5678" },
            }))
            .send(&make_service(quotations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_with_incomplete_contact_returns_400() -> TestResult {
        let mut quotations = MockQuotationsService::new();

        quotations
            .expect_create_from_cart()
            .once()
            .return_once(|_, _, _| Err(QuotationsServiceError::MissingCustomerData));

        let res = TestClient::post("http://example.com/quotations/create")
            .json(&json!({
                "items": [{
                    "id": "item-1",
                    "productId": Uuid::nil(),
                    "name": "Poncho de lana",
                    "unitPrice": 12_500,
                    "quantity": 1,
                }],
                "customerData": { "name": "", "phone": "" },
            }))
            .send(&make_service(quotations))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_without_a_session_returns_401() -> TestResult {
        let mut quotations = MockQuotationsService::new();

        quotations.expect_create_from_cart().never();

        let res = TestClient::post("http://example.com/quotations/create")
            .json(&cart_body())
            .send(&public_quotations_service(
                quotations,
                Router::with_path("quotations/create").post(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
