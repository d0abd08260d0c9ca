use actix_web::{web, HttpResponse, Responder};

use crate::models::{ErrorResponse, SubscriptionResponse};
use crate::routes::AppState;

/// Configure subscription routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/subscription/{user_id}", web::get().to(get_status))
        .route("/subscription/{user_id}/refresh", web::post().to(refresh_status));
}

/// Current subscription status
///
/// GET /api/v1/subscription/{user_id}
async fn get_status(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    respond(&state, &path.into_inner()).await
}

/// Drop the cached status and fetch it again, e.g. right after checkout
///
/// POST /api/v1/subscription/{user_id}/refresh
async fn refresh_status(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();
    state.billing.invalidate(&user_id).await;
    respond(&state, &user_id).await
}

async fn respond(state: &AppState, user_id: &str) -> HttpResponse {
    match state.billing.subscription_status(user_id).await {
        Ok(status) => HttpResponse::Ok().json(SubscriptionResponse { success: true, status }),
        Err(e) => {
            tracing::error!("Failed to fetch subscription for {}: {}", user_id, e);
            HttpResponse::BadGateway().json(ErrorResponse::new(e.to_string()))
        }
    }
}
