//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use feria_app::{
    auth::{MockAuthService, UserUuid},
    context::AppContext,
    domain::{
        orders::records::{
            OrderLine, OrderLineUuid, OrderRecord, OrderStatus, OrderUuid, PaymentStatus,
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        quotations::{
            MockQuotationsService,
            records::{
                CustomerInfo, QuotationLine, QuotationLineUuid, QuotationRecord, QuotationStatus,
                QuotationUuid,
            },
        },
        tenants::{
            MockTenantsService,
            records::{TenantRecord, TenantUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_TENANT_UUID: TenantUuid = TenantUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_tenant(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_tenant_uuid(TEST_TENANT_UUID);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();
    products.expect_browse_store().never();

    products
}

fn strict_quotations_mock() -> MockQuotationsService {
    let mut quotations = MockQuotationsService::new();

    quotations.expect_create_from_cart().never();
    quotations.expect_respond().never();
    quotations.expect_convert().never();
    quotations.expect_mark_viewed().never();

    quotations
}

fn strict_tenants_mock() -> MockTenantsService {
    let mut tenants = MockTenantsService::new();

    tenants.expect_create_tenant().never();
    tenants.expect_add_staff_member().never();
    tenants.expect_find_for_user().never();
    tenants.expect_user_can_manage().never();

    tenants
}

fn make_state(
    auth: MockAuthService,
    products: MockProductsService,
    quotations: MockQuotationsService,
    tenants: MockTenantsService,
) -> Arc<State> {
    let app = AppContext {
        auth: Arc::new(auth),
        products: Arc::new(products),
        quotations: Arc::new(quotations),
        tenants: Arc::new(tenants),
    };

    Arc::new(State::new(app))
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    make_state(
        auth,
        strict_products_mock(),
        strict_quotations_mock(),
        strict_tenants_mock(),
    )
}

pub(crate) fn state_with_products(products: MockProductsService) -> Arc<State> {
    make_state(
        strict_auth_mock(),
        products,
        strict_quotations_mock(),
        strict_tenants_mock(),
    )
}

pub(crate) fn state_with_quotations(quotations: MockQuotationsService) -> Arc<State> {
    make_state(
        strict_auth_mock(),
        strict_products_mock(),
        quotations,
        strict_tenants_mock(),
    )
}

pub(crate) fn state_with_tenants(tenants: MockTenantsService) -> Arc<State> {
    make_state(
        strict_auth_mock(),
        strict_products_mock(),
        strict_quotations_mock(),
        tenants,
    )
}

/// Authenticated catalog route: state plus the caller's store in the
/// depot.
pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_products(products)))
            .hoop(inject_tenant)
            .push(route),
    )
}

/// Public catalog route: state only, no auth context.
pub(crate) fn public_products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_products(products)))
            .push(route),
    )
}

/// Authenticated quotation route: state plus the caller in the depot.
pub(crate) fn quotations_service(quotations: MockQuotationsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_quotations(quotations)))
            .hoop(inject_user)
            .push(route),
    )
}

/// Public quotation route: state only, no auth context.
pub(crate) fn public_quotations_service(
    quotations: MockQuotationsService,
    route: Router,
) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_quotations(quotations)))
            .push(route),
    )
}

pub(crate) fn make_tenant(uuid: TenantUuid) -> TenantRecord {
    TenantRecord {
        uuid,
        name: "Feria Artesanal".to_string(),
        slug: "feria-artesanal".to_string(),
        owner_uuid: TEST_USER_UUID,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Poncho de lana".to_string(),
        description: None,
        price: 12_500,
        image: None,
        sizes: vec![],
        colors: vec![],
        active: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_quotation(uuid: QuotationUuid) -> QuotationRecord {
    QuotationRecord {
        uuid,
        ticket: "COT-123456-789".to_string(),
        tenant_uuid: TEST_TENANT_UUID,
        user_uuid: TEST_USER_UUID,
        customer: CustomerInfo {
            name: "María Quispe".to_string(),
            phone: "+56 9 1234 5678".to_string(),
            email: None,
            city: "Santiago".to_string(),
        },
        lines: vec![QuotationLine {
            uuid: QuotationLineUuid::from_uuid(Uuid::nil()),
            product_uuid: ProductUuid::from_uuid(Uuid::nil()),
            name: "Poncho de lana".to_string(),
            size: None,
            color: None,
            quantity: 1,
            unit_price: 12_500,
            subtotal: 12_500,
            image: None,
        }],
        subtotal: 12_500,
        discount: 0,
        total: 12_500,
        status: QuotationStatus::Pending,
        notes: None,
        order_uuid: None,
        admin_viewed_at: None,
        responded_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        ticket: "ORD-123456-789".to_string(),
        tenant_uuid: TEST_TENANT_UUID,
        customer_name: "María Quispe".to_string(),
        customer_phone: "+56 9 1234 5678".to_string(),
        customer_email: None,
        customer_city: "Santiago".to_string(),
        lines: vec![OrderLine {
            uuid: OrderLineUuid::from_uuid(Uuid::nil()),
            product_uuid: ProductUuid::from_uuid(Uuid::nil()),
            name: "Poncho de lana".to_string(),
            size: None,
            color: None,
            quantity: 1,
            unit_price: 12_500,
            subtotal: 12_500,
            image: None,
        }],
        subtotal: 12_500,
        discount: 0,
        total: 12_500,
        status: OrderStatus::Confirmed,
        payment_status: PaymentStatus::Paid,
        paid_at: Some(Timestamp::UNIX_EPOCH),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
