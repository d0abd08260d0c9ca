//! jobmatch - matching and AI proxy service for the remote jobs marketplace
//!
//! This library scores candidates against job postings, decides which (user, job)
//! pairs to score for a request, and persists qualifying matches in the hosted store.
//! It also fronts the LLM-backed resume analysis and career chat, and the billing API.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{MatchError, MatchOrchestrator, Matcher, SweepSettings};
pub use models::{Job, JobMatch, MatchRequest, MatchResponse, ScoringWeights, User};
