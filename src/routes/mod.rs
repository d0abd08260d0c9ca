// Route exports
pub mod assistant;
pub mod matches;
pub mod subscription;

use actix_web::web;
use std::sync::Arc;

use crate::core::MatchOrchestrator;
use crate::services::{BillingClient, LlmClient, StoreClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreClient>,
    pub orchestrator: MatchOrchestrator,
    pub llm: Arc<LlmClient>,
    pub billing: Arc<BillingClient>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(assistant::configure)
            .configure(subscription::configure),
    );
}
