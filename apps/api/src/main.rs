mod auth;
mod config;
mod dashboard;
mod db;
mod errors;
mod extraction;
mod interview;
mod links;
mod models;
mod routes;
mod state;
mod store;
mod validation;
mod wizard;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::auth::SessionStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::build_extractor;
use crate::interview::InterviewRegistry;
use crate::links::BaseUrlLinkIssuer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{PgStore, RecruitmentStore};
use crate::wizard::WizardRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SELECTRA API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs embedded migrations)
    let db = create_pool(&config.database_url).await?;
    let store: Arc<dyn RecruitmentStore> = Arc::new(PgStore::new(db));

    // Initialize Redis session store
    let redis = redis::Client::open(config.redis_url.clone())
        .context("Invalid REDIS_URL")?;
    let sessions = SessionStore::new(redis, config.session_ttl_secs);
    info!("Session store initialized (ttl {}s)", config.session_ttl_secs);

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // CV extractor (MockCvExtractor by default, swap via CV_EXTRACTOR)
    let extractor = build_extractor(&config);
    info!("CV extractor: {:?}", config.cv_extractor);

    let state = AppState {
        store: store.clone(),
        sessions,
        s3,
        extractor,
        links: Arc::new(BaseUrlLinkIssuer::new(&config.app_base_url)),
        wizards: Arc::new(WizardRegistry::new()),
        interviews: Arc::new(InterviewRegistry::new(store, config.interview_budget_secs)),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to APP_BASE_URL in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "selectra-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
