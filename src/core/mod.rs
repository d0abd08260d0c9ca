// Core algorithm exports
pub mod career;
pub mod filters;
pub mod matcher;
pub mod orchestrator;
pub mod resume;
pub mod scoring;

pub use career::{build_conversation, career_reply};
pub use filters::{is_region_friendly, matching_skills, region_for_location, Region};
pub use matcher::Matcher;
pub use orchestrator::{MatchError, MatchOrchestrator, MatchOutcome, MatchTarget, SweepSettings};
pub use resume::{analyze_resume, heuristic_extract, ResumeAnalysis, ResumeProfile};
pub use scoring::{calculate_match_score, MatchScore};
