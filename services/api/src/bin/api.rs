//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{HttpImageUploader, HttpPageRepository},
    config::Config,
    error::ApiError,
    web::{
        add_section_handler, clear_image_handler, close_session_handler, get_session_handler,
        image_preview_handler, list_pages_handler, move_section_handler, open_session_handler,
        remove_section_handler, rest::ApiDoc, save_session_handler, stage_image_handler,
        state::AppState, state::SessionRegistry, update_section_handler,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
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

    // --- 2. Initialize the Upstream Adapters ---
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| ApiError::Internal(format!("failed to build HTTP client: {e}")))?;
    let pages = Arc::new(HttpPageRepository::new(
        client.clone(),
        config.upstream_base_url.clone(),
        config.upstream_api_token.clone(),
    ));
    let images = Arc::new(HttpImageUploader::new(
        client,
        config.upstream_base_url.clone(),
        config.upstream_api_token.clone(),
    ));
    info!("Upstream adapters ready for {}", config.upstream_base_url);

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        pages,
        images,
        config: config.clone(),
        sessions: SessionRegistry::new(),
    });

    let allowed_origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("invalid ALLOWED_ORIGIN: {e}")))?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let api_router = Router::new()
        .route("/pages", get(list_pages_handler))
        .route("/editor/sessions", post(open_session_handler))
        .route(
            "/editor/sessions/{session_id}",
            get(get_session_handler).delete(close_session_handler),
        )
        .route(
            "/editor/sessions/{session_id}/sections",
            post(add_section_handler),
        )
        .route(
            "/editor/sessions/{session_id}/sections/{section_id}",
            put(update_section_handler).delete(remove_section_handler),
        )
        .route(
            "/editor/sessions/{session_id}/sections/{section_id}/position",
            put(move_section_handler),
        )
        .route(
            "/editor/sessions/{session_id}/sections/{section_id}/image",
            post(stage_image_handler).delete(clear_image_handler),
        )
        .route(
            "/editor/sessions/{session_id}/sections/{section_id}/image/preview",
            get(image_preview_handler),
        )
        .route(
            "/editor/sessions/{session_id}/save",
            post(save_session_handler),
        )
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete
    // application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
