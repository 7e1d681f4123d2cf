//! Test Helpers

use crate::{
    domain::{
        carts::models::CartItem,
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        quotations::data::CustomerContact,
        tenants::records::TenantUuid,
    },
    test::TestContext,
};

pub(crate) async fn create_product(
    ctx: &TestContext,
    tenant: TenantUuid,
    name: &str,
    price: u64,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(
            tenant,
            NewProduct {
                uuid: ProductUuid::new(),
                name: name.to_string(),
                description: None,
                price,
                image: None,
                sizes: Vec::new(),
                colors: Vec::new(),
            },
        )
        .await
}

/// A cart line for one unit batch of a product, the way the storefront
/// records it.
pub(crate) fn cart_item(product: &ProductRecord, tenant: TenantUuid, quantity: u32) -> CartItem {
    CartItem {
        id: format!("{}-{quantity}", product.uuid),
        product_uuid: product.uuid,
        tenant_uuid: Some(tenant),
        name: product.name.clone(),
        unit_price: product.price,
        image: product.image.clone(),
        quantity,
        size: None,
        color: None,
    }
}

/// Default customer contact details used across quotation tests.
pub(crate) fn customer() -> CustomerContact {
    CustomerContact {
        name: "María Quispe".to_string(),
        phone: "+56 9 1234 5678".to_string(),
        email: Some("maria@example.com".to_string()),
        city: None,
    }
}
