//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use feria_app::domain::products::records::{ProductRecord, ProductUuid};

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,

    /// Unit price in minor currency units.
    pub price: u64,

    pub image: Option<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub active: bool,
}

impl From<ProductRecord> for ProductResponse {
    fn from(record: ProductRecord) -> Self {
        Self {
            uuid: record.uuid.into_uuid(),
            name: record.name,
            description: record.description,
            price: record.price,
            image: record.image,
            sizes: record.sizes,
            colors: record.colors,
            active: record.active,
        }
    }
}

/// Get Product Handler
#[endpoint(
    tags("products"),
    summary = "Get Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product found"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let product = state
        .app
        .products
        .get_product(tenant, ProductUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use feria_app::domain::products::{MockProductsService, ProductsServiceError};

    use crate::test_helpers::{TEST_TENANT_UUID, make_product, products_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        products_service(
            products,
            Router::with_path("products").push(Router::with_path("{uuid}").get(handler)),
        )
    }

    #[tokio::test]
    async fn test_get_product_returns_200() -> TestResult {
        let uuid = ProductUuid::new();
        let product = make_product(uuid);
        let name = product.name.clone();

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .withf(move |tenant, requested| {
                *tenant == TEST_TENANT_UUID && *requested == uuid
            })
            .return_once(move |_, _| Ok(product));

        products.expect_list_products().never();
        products.expect_create_product().never();
        products.expect_update_product().never();
        products.expect_delete_product().never();

        let mut res = TestClient::get(format!("http://example.com/products/{uuid}"))
            .send(&make_service(products))
            .await;

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.name, name);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_returns_404() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::NotFound));

        products.expect_list_products().never();
        products.expect_create_product().never();
        products.expect_update_product().never();
        products.expect_delete_product().never();

        let res = TestClient::get(format!("http://example.com/products/{uuid}"))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
