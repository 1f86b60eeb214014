//! services/api/src/bin/api.rs

use ancient_eats_core::catalog::Catalog;
use ancient_eats_core::session::Session;
use api_lib::{
    adapters::{wallet, FileStateStore, HttpPaymentAdapter, OpenAiImageAdapter},
    config::Config,
    error::ApiError,
    web::{
        auth::{login_handler, logout_handler, register_handler},
        rest::ApiDoc,
        state::AppState,
        library_handler, promo_pdf_handler, purchase_handler, storefront_handler,
        subscribe_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the State Store & Rehydrate the Session ---
    info!("Opening state store at {:?}", config.state_dir);
    let store = Arc::new(FileStateStore::new(config.state_dir.clone())?);
    let session = Session::load(store).await?;
    if let Some(user) = session.user() {
        info!(user = %user.name, "restored saved session");
    }

    // --- 3. Initialize Service Adapters ---
    let wallet = wallet::connect(config.wallet_private_key.clone());
    let http = reqwest::Client::new();
    let payments = Arc::new(HttpPaymentAdapter::new(
        http.clone(),
        config.payment_base_url.clone(),
        wallet,
    ));

    let openai_client = config
        .live_openai_api_key()
        .map(|key| Client::with_config(OpenAIConfig::new().with_api_key(key)));
    if openai_client.is_none() {
        info!("No image-generation credential configured; promo images run in demo mode");
    }
    let images = Arc::new(OpenAiImageAdapter::new(
        openai_client,
        http,
        &config.image_model,
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        catalog: Arc::new(Catalog::new()),
        session: Arc::new(RwLock::new(session)),
        payments,
        images,
        config: config.clone(),
    });

    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().map_err(|e| {
            ApiError::Internal(format!("invalid CORS origin: {e}"))
        })?)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route("/", get(storefront_handler))
        .route("/library", get(library_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/products/{id}/purchase", post(purchase_handler))
        .route("/products/{id}/promo-pdf", get(promo_pdf_handler))
        .route("/subscribe", post(subscribe_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
