//! Store Catalog Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::error;

use feria_app::domain::products::ProductsServiceError;

use crate::{extensions::*, products::index::ProductsResponse, state::State};

/// Store Catalog Handler
///
/// Returns the active products of a store, addressed by its public
/// slug. No session required.
#[endpoint(
    tags("stores"),
    summary = "Browse a store's catalog",
    responses(
        (status_code = StatusCode::OK, description = "Active products"),
        (status_code = StatusCode::NOT_FOUND, description = "Store not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    slug: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .products
        .browse_store(&slug.into_inner())
        .await
        .map_err(|error| match error {
            ProductsServiceError::NotFound => StatusError::not_found().brief("Store not found"),
            source => {
                error!("failed to browse store catalog: {source}");

                StatusError::internal_server_error()
            }
        })?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use feria_app::domain::products::{MockProductsService, records::ProductUuid};

    use crate::test_helpers::{make_product, public_products_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        public_products_service(
            products,
            Router::with_path("stores/{slug}/products").get(handler),
        )
    }

    #[tokio::test]
    async fn test_browse_returns_the_store_catalog() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_browse_store()
            .once()
            .withf(|slug| slug == "feria-artesanal")
            .return_once(move |_| Ok(vec![make_product(uuid)]));

        products.expect_list_products().never();

        let mut res = TestClient::get("http://example.com/stores/feria-artesanal/products")
            .send(&make_service(products))
            .await;

        let body: ProductsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.products.first().map(|product| product.uuid),
            Some(uuid.into_uuid())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_browse_unknown_slug_returns_404() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_browse_store()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let res = TestClient::get("http://example.com/stores/no-such-store/products")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
