use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body accepted by the match endpoint
///
/// Which identifying fields are present decides the orchestration mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub batch_match: Option<bool>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_data: Option<serde_json::Value>,
    #[serde(default)]
    pub job_preferences: Option<JobPreferences>,
}

/// Optional narrowing of a user sweep
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPreferences {
    #[serde(default)]
    pub category: Option<String>,
}

/// Request to analyze a pasted resume
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeResumeRequest {
    #[validate(length(min = 1, max = 50000))]
    #[serde(alias = "resumeText")]
    pub resume_text: String,
}

/// Request to the career chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CareerChatRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// One earlier turn of a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}
