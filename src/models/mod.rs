// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AutomationLogEntry, ExperienceLevel, Job, JobMatch, MatchMode, MatchReasons, Normalization,
    RegionalHiring, ScoringWeights, User,
};
pub use requests::{AnalyzeResumeRequest, CareerChatRequest, ChatRole, ChatTurn, JobPreferences, MatchRequest};
pub use responses::{
    AnalyzeResumeResponse, CareerChatResponse, ErrorResponse, HealthResponse, MatchResponse,
    SubscriptionResponse,
};
