//! Feria JSON API Server

use std::{process, sync::Arc};

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use feria_app::{
    context::AppContext,
    render::{DocumentRenderer, HttpDocumentRenderer, RendererConfig},
};

use crate::{config::ServerConfig, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod auth;
mod config;
mod extensions;
mod healthcheck;
mod products;
mod quotations;
mod shutdown;
mod state;
mod stores;
#[cfg(test)]
mod test_helpers;

/// Feria JSON API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        #[expect(clippy::exit, reason = "cannot start without configuration")]
        process::exit(1);
    });

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let renderer: Arc<dyn DocumentRenderer> = Arc::new(HttpDocumentRenderer::new(RendererConfig {
        addr: config.renderer_addr,
    }));

    let app = match AppContext::from_database_url(&config.database_url, renderer).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            #[expect(clippy::exit, reason = "cannot serve without the app context")]
            process::exit(1);
        }
    };

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app)))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("api")
                .push(Router::with_path("quotations/respond").post(quotations::respond::handler))
                .push(Router::with_path("stores/{slug}/products").get(stores::products::handler))
                .push(
                    Router::new()
                        .hoop(auth::middleware::handler)
                        .push(
                            Router::with_path("quotations")
                                .push(
                                    Router::with_path("create").post(quotations::create::handler),
                                )
                                .push(
                                    Router::with_path("convert").post(quotations::convert::handler),
                                )
                                .push(
                                    Router::with_path("mark-viewed")
                                        .post(quotations::mark_viewed::handler),
                                ),
                        )
                        .push(
                            Router::with_path("products")
                                .hoop(auth::store::handler)
                                .get(products::index::handler)
                                .post(products::create::handler)
                                .push(
                                    Router::with_path("{uuid}")
                                        .get(products::get::handler)
                                        .put(products::update::handler)
                                        .delete(products::delete::handler),
                                ),
                        ),
                ),
        );

    let doc = OpenApi::new("Feria API", "0.3.0")
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;
}
