use serde::{Deserialize, Serialize};

use crate::core::resume::ResumeAnalysis;
use crate::services::billing::SubscriptionStatus;

/// Success envelope of the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub success: bool,
    pub message: String,
    pub matches_created: usize,
}

/// Error envelope shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResumeResponse {
    pub success: bool,
    pub analysis: ResumeAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerChatResponse {
    pub success: bool,
    pub reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub success: bool,
    pub status: SubscriptionStatus,
}
