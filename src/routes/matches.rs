use actix_web::{web, HttpResponse, Responder};

use crate::core::MatchError;
use crate::models::{ErrorResponse, HealthResponse, MatchRequest, MatchResponse};
use crate::routes::AppState;

/// Configure match and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::resource(["/matches", "/matches/run"])
            .route(web::post().to(run_matches))
            .default_service(web::route().to(method_not_allowed)),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run match scoring
///
/// POST /api/v1/matches
///
/// Request body:
/// ```json
/// {
///   "user_id": "string",
///   "job_id": "string",
///   "batch_match": false,
///   "event_type": "string",
///   "job_preferences": { "category": "string" }
/// }
/// ```
///
/// A body that does not decode gets the same 500 envelope as any other invalid request.
async fn run_matches(state: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    let req: MatchRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::info!("Unparsable match request body: {}", e);
            return error_response(&MatchError::InvalidRequest);
        }
    };

    match state.orchestrator.run(&req).await {
        Ok(outcome) => HttpResponse::Ok().json(MatchResponse {
            success: true,
            message: outcome.message,
            matches_created: outcome.matches_created,
        }),
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &MatchError) -> HttpResponse {
    tracing::error!("Match run failed: {}", err);
    HttpResponse::InternalServerError().json(ErrorResponse::new(err.to_string()))
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ErrorResponse::new("Method not allowed"))
}
