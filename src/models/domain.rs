use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Seniority ladder shared by users and jobs
///
/// `Any` is only meaningful on a job and accepts every user level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
    Any,
}

impl ExperienceLevel {
    /// Parse a level from store text, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "entry" => Some(Self::Entry),
            "mid" => Some(Self::Mid),
            "senior" => Some(Self::Senior),
            "lead" => Some(Self::Lead),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    /// Position on the ordered scale [entry, mid, senior, lead]; `Any` has none
    pub fn rank(self) -> Option<u8> {
        match self {
            Self::Entry => Some(0),
            Self::Mid => Some(1),
            Self::Senior => Some(2),
            Self::Lead => Some(3),
            Self::Any => None,
        }
    }
}

/// Candidate profile as stored in the `profiles` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_level")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Self-reported openness of a job to hiring from given regions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalHiring {
    #[serde(default, deserialize_with = "null_as_default")]
    pub africa_friendly: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub asia_friendly: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latam_friendly: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visa_sponsorship: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timezone_flexibility: bool,
}

/// Job posting as stored in the `jobs` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub required_skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_level")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_remote: bool,
    #[serde(default)]
    pub regional_hiring: Option<RegionalHiring>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Per-factor breakdown stored alongside a match score
///
/// Percentages are 0-100. Remote-friendliness contributes to the score but has no entry here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReasons {
    pub skills_match: u8,
    pub matching_skills: Vec<String>,
    pub experience_match: u8,
    pub location_preference: u8,
}

/// Row of the `job_matches` table, unique on (user_id, job_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub user_id: String,
    pub job_id: String,
    pub match_score: u8,
    pub match_reasons: MatchReasons,
    pub updated_at: DateTime<Utc>,
}

/// How the orchestrator selected the pairs it scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    SinglePair,
    UserSweep,
    JobSweep,
    Batch,
}

impl MatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SinglePair => "single_pair",
            Self::UserSweep => "user_sweep",
            Self::JobSweep => "job_sweep",
            Self::Batch => "batch",
        }
    }
}

/// Append-only audit record of one orchestration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationLogEntry {
    pub id: uuid::Uuid,
    pub automation_type: String,
    pub mode: MatchMode,
    pub event_type: Option<String>,
    pub matches_created: usize,
    pub executed_at: DateTime<Utc>,
}

impl AutomationLogEntry {
    pub fn job_matching(mode: MatchMode, event_type: Option<String>, matches_created: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            automation_type: "job_matching".to_string(),
            mode,
            event_type,
            matches_created,
            executed_at: Utc::now(),
        }
    }
}

/// Points awarded per factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub remote: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.skills + self.experience + self.location + self.remote
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 40.0,
            experience: 25.0,
            location: 20.0,
            remote: 15.0,
        }
    }
}

/// Denominator used when turning achieved points into a 0-100 score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Divide by the sum of all weights; missing data scores zero
    #[default]
    FixedTotal,
    /// Divide only by the weights whose inputs were present on both records
    ApplicableWeights,
}

fn lenient_level<'de, D>(deserializer: D) -> Result<Option<ExperienceLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ExperienceLevel::parse))
}

/// Timestamps without an offset are taken as UTC; anything unparseable is treated as absent
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
