use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::core::matcher::Matcher;
use crate::models::{AutomationLogEntry, Job, MatchMode, MatchRequest};
use crate::services::store::{StoreClient, StoreError};

/// Errors that abort an orchestration run
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid match request parameters")]
    InvalidRequest,

    #[error("User or job not found")]
    PairNotFound,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Time windows and thresholds for the sweep modes
#[derive(Debug, Clone)]
pub struct SweepSettings {
    /// Minimum score a sweep match needs to be stored
    pub quality_floor: u8,
    pub user_sweep_days: i64,
    pub job_sweep_days: i64,
    pub batch_window_days: i64,
    pub batch_job_limit: usize,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            quality_floor: 60,
            user_sweep_days: 30,
            job_sweep_days: 60,
            batch_window_days: 7,
            batch_job_limit: 50,
        }
    }
}

/// Which pairs a request asks to score
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchTarget {
    Pair { user_id: String, job_id: String },
    User { user_id: String, category: Option<String> },
    Job { job_id: String },
    Batch,
}

impl MatchTarget {
    /// Resolve the mode from the identifying fields of a request
    ///
    /// Ids take precedence over the batch flag; blank strings count as absent.
    pub fn from_request(req: &MatchRequest) -> Result<Self, MatchError> {
        let user_id = non_blank(req.user_id.as_deref());
        let job_id = non_blank(req.job_id.as_deref());

        match (user_id, job_id) {
            (Some(user_id), Some(job_id)) => Ok(Self::Pair { user_id, job_id }),
            (Some(user_id), None) => Ok(Self::User {
                user_id,
                category: non_blank(
                    req.job_preferences
                        .as_ref()
                        .and_then(|p| p.category.as_deref()),
                ),
            }),
            (None, Some(job_id)) => Ok(Self::Job { job_id }),
            (None, None) if req.batch_match == Some(true) => Ok(Self::Batch),
            (None, None) => Err(MatchError::InvalidRequest),
        }
    }

    pub fn mode(&self) -> MatchMode {
        match self {
            Self::Pair { .. } => MatchMode::SinglePair,
            Self::User { .. } => MatchMode::UserSweep,
            Self::Job { .. } => MatchMode::JobSweep,
            Self::Batch => MatchMode::Batch,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub mode: MatchMode,
    pub matches_created: usize,
    pub message: String,
}

/// Selects (user, job) pairs per request mode, scores them, persists qualifying
/// matches and records one automation log entry per successful run.
///
/// Runs strictly sequentially; any store failure aborts the run before the log
/// entry is written.
#[derive(Clone)]
pub struct MatchOrchestrator {
    store: Arc<StoreClient>,
    matcher: Matcher,
    settings: SweepSettings,
}

impl MatchOrchestrator {
    pub fn new(store: Arc<StoreClient>, matcher: Matcher, settings: SweepSettings) -> Self {
        Self {
            store,
            matcher,
            settings,
        }
    }

    /// Handle one match request end to end
    pub async fn run(&self, req: &MatchRequest) -> Result<MatchOutcome, MatchError> {
        let target = MatchTarget::from_request(req)?;
        let mode = target.mode();

        tracing::info!("Starting match run: mode={}", mode.as_str());

        let (matches_created, message) = match &target {
            MatchTarget::Pair { user_id, job_id } => {
                let score = self.match_pair(user_id, job_id).await?;
                (1, format!("Match calculated with score {}", score))
            }
            MatchTarget::User { user_id, category } => {
                let count = self.sweep_user(user_id, category.as_deref()).await?;
                (count, format!("Found {} matches for user {}", count, user_id))
            }
            MatchTarget::Job { job_id } => {
                let job = self
                    .store
                    .get_job(job_id)
                    .await?
                    .ok_or_else(|| MatchError::JobNotFound(job_id.clone()))?;
                let count = self.sweep_job(&job).await?;
                (count, format!("Found {} matches for job {}", count, job_id))
            }
            MatchTarget::Batch => {
                let (jobs, count) = self.sweep_batch().await?;
                (count, format!("Batch matching processed {} jobs, created {} matches", jobs, count))
            }
        };

        let entry = AutomationLogEntry::job_matching(mode, req.event_type.clone(), matches_created);
        self.store.append_log(&entry).await?;

        tracing::info!(
            "Finished match run: mode={}, matches_created={}",
            mode.as_str(),
            matches_created
        );

        Ok(MatchOutcome {
            mode,
            matches_created,
            message,
        })
    }

    /// Score an explicit pair and store it regardless of score
    async fn match_pair(&self, user_id: &str, job_id: &str) -> Result<u8, MatchError> {
        let user = self.store.get_user(user_id).await?;
        let job = self.store.get_job(job_id).await?;
        let (Some(user), Some(job)) = (user, job) else {
            return Err(MatchError::PairNotFound);
        };

        let row = self.matcher.build_match(&user, &job);
        let score = row.match_score;
        self.store.upsert_matches(std::slice::from_ref(&row)).await?;

        tracing::debug!("Pair {} / {} scored {}", user_id, job_id, score);

        Ok(score)
    }

    /// Score one user against recent jobs
    async fn sweep_user(&self, user_id: &str, category: Option<&str>) -> Result<usize, MatchError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| MatchError::UserNotFound(user_id.to_string()))?;

        let since = Utc::now() - Duration::days(self.settings.user_sweep_days);
        let jobs = self.store.jobs_created_since(since, category, None).await?;

        let matches = self
            .matcher
            .match_user_against_jobs(&user, &jobs, self.settings.quality_floor);

        tracing::debug!(
            "User {} scored against {} jobs, {} qualify",
            user_id,
            jobs.len(),
            matches.len()
        );

        Ok(self.store.upsert_matches(&matches).await?)
    }

    /// Score one job against recently created users
    async fn sweep_job(&self, job: &Job) -> Result<usize, MatchError> {
        let since = Utc::now() - Duration::days(self.settings.job_sweep_days);
        let users = self.store.users_created_since(since).await?;

        let matches = self
            .matcher
            .match_job_against_users(job, &users, self.settings.quality_floor);

        tracing::debug!(
            "Job {} scored against {} users, {} qualify",
            job.id,
            users.len(),
            matches.len()
        );

        Ok(self.store.upsert_matches(&matches).await?)
    }

    /// Run a job sweep for every recently created job, one after another
    async fn sweep_batch(&self) -> Result<(usize, usize), MatchError> {
        let since = Utc::now() - Duration::days(self.settings.batch_window_days);
        let jobs = self
            .store
            .jobs_created_since(since, None, Some(self.settings.batch_job_limit))
            .await?;

        let mut total = 0;
        for job in &jobs {
            total += self.sweep_job(job).await?;
        }

        Ok((jobs.len(), total))
    }
}
