use chrono::Utc;

use crate::core::scoring::{calculate_match_score, MatchScore};
use crate::models::{Job, JobMatch, Normalization, ScoringWeights, User};

/// Pure scoring front-end used by the orchestrator
///
/// Holds the configured weights and denominator policy; never performs I/O.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    normalization: Normalization,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, normalization: Normalization) -> Self {
        Self {
            weights,
            normalization,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), Normalization::default())
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single (user, job) pair
    pub fn score(&self, user: &User, job: &Job) -> MatchScore {
        calculate_match_score(user, job, &self.weights, self.normalization)
    }

    /// Score a pair and shape it as a storable match row, whatever the score
    pub fn build_match(&self, user: &User, job: &Job) -> JobMatch {
        let MatchScore { score, reasons } = self.score(user, job);
        JobMatch {
            user_id: user.id.clone(),
            job_id: job.id.clone(),
            match_score: score,
            match_reasons: reasons,
            updated_at: Utc::now(),
        }
    }

    /// Score one user against many jobs, keeping matches at or above `min_score`
    pub fn match_user_against_jobs(&self, user: &User, jobs: &[Job], min_score: u8) -> Vec<JobMatch> {
        jobs.iter()
            .map(|job| self.build_match(user, job))
            .filter(|m| m.match_score >= min_score)
            .collect()
    }

    /// Score one job against many users, keeping matches at or above `min_score`
    pub fn match_job_against_users(&self, job: &Job, users: &[User], min_score: u8) -> Vec<JobMatch> {
        users
            .iter()
            .map(|user| self.build_match(user, job))
            .filter(|m| m.match_score >= min_score)
            .collect()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
