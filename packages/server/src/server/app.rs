//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::competitors::PgCompetitorDirectory;
use crate::domains::crawling::{BatchDispatcher, JobStatusResolver, PgCrawlJobStore};
use crate::kernel::{ApifyScrapeInvoker, ServerDeps};
use crate::server::routes::{dispatch_handler, health_handler, status_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
    pub dispatcher: Arc<BatchDispatcher>,
    pub resolver: Arc<JobStatusResolver>,
    /// Root token; cancelling it stops an in-flight batch between
    /// competitors and begins graceful shutdown.
    pub cancel: CancellationToken,
}

/// Build the Axum application router.
///
/// Returns the router plus the root cancellation token so main can tie it
/// to shutdown signals.
pub fn build_app(pool: PgPool, config: &Config) -> (Router, CancellationToken) {
    let apify = Arc::new(apify_client::ApifyClient::new(
        config.apify_api_token.clone(),
    ));

    let server_deps = Arc::new(ServerDeps::new(
        pool.clone(),
        Arc::new(PgCompetitorDirectory::new(pool.clone())),
        Arc::new(ApifyScrapeInvoker::new(
            pool.clone(),
            apify,
            config.apify_actor_id.clone(),
        )),
        Arc::new(PgCrawlJobStore::new(pool.clone())),
    ));

    let dispatcher = Arc::new(
        BatchDispatcher::new(
            server_deps.directory.clone(),
            server_deps.invoker.clone(),
        )
        .with_pacing(config.dispatch_pacing)
        .with_invoke_timeout(config.invoke_timeout),
    );

    let resolver = Arc::new(JobStatusResolver::new(server_deps.job_store.clone()));

    let cancel = CancellationToken::new();

    let app_state = AppState {
        db_pool: pool,
        server_deps,
        dispatcher,
        resolver,
        cancel: cancel.clone(),
    };

    // CORS configuration - the dashboard frontend runs as a separate service
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let app = Router::new()
        .route("/crawl/dispatch", post(dispatch_handler))
        .route("/crawl/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    (app, cancel)
}
