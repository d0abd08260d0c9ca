use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use jobmatch::config::{LoggingSettings, Settings};
use jobmatch::core::{MatchOrchestrator, Matcher, SweepSettings};
use jobmatch::models::ScoringWeights;
use jobmatch::routes::{self, AppState};
use jobmatch::services::{BillingClient, LlmClient, LlmOptions, StoreClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub success: bool,
    pub error: String,
    #[serde(skip)]
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        success: false,
        error: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        success: false,
        error: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_logging(&logging);

    info!("Starting jobmatch service...");

    let settings = settings.unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    let store = Arc::new(
        StoreClient::new(
            settings.store.url.clone(),
            settings.store.service_key.clone(),
            settings.store.tables.clone(),
            Duration::from_secs(settings.store.timeout_secs.unwrap_or(30)),
        )
        .map_err(|e| {
            error!("Failed to create store client: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?,
    );

    info!("Store client initialized for {}", settings.store.url);

    let matcher = Matcher::new(
        ScoringWeights::from(&settings.scoring.weights),
        settings.scoring.normalization,
    );

    info!(
        "Matcher initialized with weights: {:?} (total {}), normalization: {:?}",
        matcher.weights(),
        matcher.weights().total(),
        settings.scoring.normalization
    );

    let orchestrator = MatchOrchestrator::new(
        store.clone(),
        matcher,
        SweepSettings::from(&settings.matching),
    );

    let llm = Arc::new(
        LlmClient::new(LlmOptions {
            base_url: settings.llm.base_url.clone(),
            api_key: settings.llm.api_key.clone(),
            model: settings.llm.model.clone(),
            max_tokens: settings.llm.max_tokens,
            max_retries: settings.llm.max_retries,
            timeout: Duration::from_secs(settings.llm.timeout_secs),
            retry_base_delay: Duration::from_secs(1),
        })
        .map_err(|e| {
            error!("Failed to create LLM client: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?,
    );

    if settings.llm.api_key.is_empty() {
        warn!("LLM API key not configured, resume analysis will use heuristics only");
    } else {
        info!("LLM client initialized (model: {})", llm.model());
    }

    let billing = Arc::new(
        BillingClient::new(
            settings.billing.api_url.clone(),
            settings.billing.api_key.clone(),
            settings.billing.entitlement.clone(),
            settings.billing.cache_size,
            Duration::from_secs(settings.billing.cache_ttl_secs),
            Duration::from_secs(30),
        )
        .map_err(|e| {
            error!("Failed to create billing client: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?,
    );

    info!(
        "Billing client initialized (entitlement: {}, cache TTL: {}s)",
        settings.billing.entitlement, settings.billing.cache_ttl_secs
    );

    let app_state = AppState {
        store,
        orchestrator,
        llm,
        billing,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
