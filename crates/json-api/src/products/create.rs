//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use feria_app::domain::products::{data::NewProduct, records::ProductUuid};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    /// Optional client-supplied identifier; generated when absent.
    #[serde(default)]
    pub uuid: Option<Uuid>,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Unit price in minor currency units.
    pub price: u64,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub sizes: Vec<String>,

    #[serde(default)]
    pub colors: Vec<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        NewProduct {
            uuid: request
                .uuid
                .map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            name: request.name,
            description: request.description,
            price: request.price,
            image: request.image,
            sizes: request.sizes,
            colors: request.colors,
        }
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::CONFLICT, description = "Product already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let product = state
        .app
        .products
        .create_product(tenant, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use feria_app::domain::products::{MockProductsService, ProductsServiceError};

    use crate::test_helpers::{TEST_TENANT_UUID, make_product, products_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        products_service(products, Router::with_path("products").post(handler))
    }

    #[tokio::test]
    async fn test_create_product_returns_201_with_location() -> TestResult {
        let uuid = ProductUuid::new();
        let product = make_product(uuid);

        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .withf(move |tenant, new| {
                *tenant == TEST_TENANT_UUID
                    && new.uuid == uuid
                    && new.name == "Poncho de lana"
                    && new.price == 12_500
            })
            .return_once(move |_, _| Ok(product));

        products.expect_list_products().never();
        products.expect_get_product().never();
        products.expect_update_product().never();
        products.expect_delete_product().never();

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({
                "uuid": uuid.into_uuid(),
                "name": "Poncho de lana",
                "price": 12_500,
            }))
            .send(&make_service(products))
            .await;

        let body: ProductResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/api/products/{uuid}").as_str()));
        assert_eq!(body.uuid, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_generates_a_uuid_when_absent() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .withf(|_, new| !new.uuid.into_uuid().is_nil())
            .return_once(|_, new| Ok(make_product(new.uuid)));

        products.expect_list_products().never();
        products.expect_get_product().never();
        products.expect_update_product().never();
        products.expect_delete_product().never();

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Chal tejido", "price": 8_900 }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_duplicate_product_returns_409() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::AlreadyExists));

        products.expect_list_products().never();
        products.expect_get_product().never();
        products.expect_update_product().never();
        products.expect_delete_product().never();

        let res = TestClient::post("http://example.com/products")
            .json(&json!({
                "uuid": uuid.into_uuid(),
                "name": "Poncho de lana",
                "price": 12_500,
            }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_invalid_payload_returns_400() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::InvalidData));

        products.expect_list_products().never();
        products.expect_get_product().never();
        products.expect_update_product().never();
        products.expect_delete_product().never();

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Poncho de lana", "price": 12_500 }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
