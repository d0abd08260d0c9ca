use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{analyze_resume, career_reply};
use crate::models::{AnalyzeResumeRequest, AnalyzeResumeResponse, CareerChatRequest, CareerChatResponse, ErrorResponse};
use crate::routes::AppState;

/// Configure AI assistant routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/resume/analyze", web::post().to(analyze))
        .route("/career/chat", web::post().to(chat));
}

/// Extract a structured profile from resume text
///
/// POST /api/v1/resume/analyze
async fn analyze(state: web::Data<AppState>, req: web::Json<AnalyzeResumeRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(format!("Validation failed: {}", errors)));
    }

    match analyze_resume(&req.resume_text, &state.llm).await {
        Ok(analysis) => {
            tracing::info!(
                "Resume analyzed: source={:?}, skills={}",
                analysis.source,
                analysis.profile.skills.len()
            );
            HttpResponse::Ok().json(AnalyzeResumeResponse {
                success: true,
                analysis,
            })
        }
        Err(e) => HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string())),
    }
}

/// Career advice chat
///
/// POST /api/v1/career/chat
async fn chat(state: web::Data<AppState>, req: web::Json<CareerChatRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(format!("Validation failed: {}", errors)));
    }

    match career_reply(&state.llm, &req.history, &req.message).await {
        Ok(reply) => HttpResponse::Ok().json(CareerChatResponse { success: true, reply }),
        Err(e) => {
            tracing::error!("Career chat failed: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse::new(e.to_string()))
        }
    }
}
