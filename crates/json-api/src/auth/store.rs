//! Store resolution middleware.
//!
//! Catalog routes act on the caller's own store. This hoop runs after
//! bearer auth and resolves the authenticated user to the tenant they
//! own or staff.

use std::sync::Arc;

use feria_app::domain::tenants::TenantsServiceError;
use salvo::prelude::*;
use tracing::error;

use crate::{extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Ok(user) = depot.user_uuid_or_401() else {
        res.render(StatusError::unauthorized());

        return;
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error());

            return;
        }
    };

    let tenant_uuid = match state.app.tenants.find_for_user(user).await {
        Ok(tenant) => tenant.uuid,
        Err(TenantsServiceError::NotFound) => {
            res.render(StatusError::not_found().brief("User has no store"));

            return;
        }
        Err(source) => {
            error!("failed to resolve store for user: {source}");

            res.render(StatusError::internal_server_error());

            return;
        }
    };

    depot.insert_tenant_uuid(tenant_uuid);

    ctrl.call_next(req, depot, res).await;
}
