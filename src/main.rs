pub mod api;
mod config;
mod fare;
mod resolve;
mod services;
mod zones;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api::AppState;
use config::Config;
use fare::model::{CoefficientModel, FarePredictor};
use services::maps::MapsClient;
use zones::ZoneStore;

#[derive(OpenApi)]
#[openapi(
    info(title = "NYC Taxi Fare API", version = "0.1.0"),
    paths(api::predict::predict_fare, api::health::health_check),
    components(schemas(
        api::predict::PredictRequest,
        api::predict::PredictResponse,
        api::predict::TripDetails,
        api::health::HealthResponse,
        api::ErrorResponse,
    )),
    tags(
        (name = "fares", description = "Taxi fare estimation"),
        (name = "health", description = "Service health check")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = Config::load("config.yaml").expect("Failed to load config");

    // Build CORS layer based on config
    let cors_layer = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode explicitly enabled (all origins allowed) - DO NOT USE IN PRODUCTION");
        CorsLayer::permissive()
    } else if !config.cors_origins.is_empty() {
        tracing::info!(origins = ?config.cors_origins, "CORS: Restricting to configured origins");
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    } else {
        panic!("CORS configuration error: Either set 'cors_origins' with allowed origins, or set 'cors_permissive: true' for development");
    };

    // Load the taxi zone table; a missing or malformed table is fatal
    let zones = Arc::new(
        ZoneStore::load(&config.zone_table).expect("Failed to load taxi zone table"),
    );
    tracing::info!(zones = zones.len(), path = %config.zone_table, "Loaded taxi zone table");

    // Load the persisted fare model
    let model: Arc<dyn FarePredictor> = Arc::new(
        CoefficientModel::load(&config.model_artifact).expect("Failed to load fare model artifact"),
    );
    tracing::info!(path = %config.model_artifact, "Loaded fare model artifact");

    let api_key = std::env::var(&config.maps_api_key_env).unwrap_or_else(|_| {
        panic!(
            "Missing Google Maps API key: set the {} environment variable",
            config.maps_api_key_env
        )
    });
    let maps = MapsClient::new(api_key).expect("Failed to build Maps client");

    let state = AppState { zones, model, maps };

    // Build the app
    let app = Router::new()
        .route("/", get(root))
        .nest("/api", api::router(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", config.bind_address));

    tracing::info!(address = %config.bind_address, "Server running");
    tracing::info!("Swagger UI: /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

async fn root() -> &'static str {
    "NYC Taxi Fare API"
}
