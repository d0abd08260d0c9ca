use crate::core::filters::{is_region_friendly, matching_skills, region_for_location};
use crate::models::{ExperienceLevel, Job, MatchReasons, Normalization, RegionalHiring, ScoringWeights, User};

/// Share of the experience weight awarded for a one-step level difference
const ADJACENT_LEVEL_CREDIT: f64 = 0.7;

/// Share of the location weight awarded when both sides are known but do not line up
const LOCATION_FALLBACK_CREDIT: f64 = 0.5;

/// Contribution of a single factor before weighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorScore {
    /// Achieved share of the factor's weight, 0.0 to 1.0
    pub fraction: f64,
    /// Whether both records carried the data this factor needs
    pub applicable: bool,
}

impl FactorScore {
    fn missing() -> Self {
        Self {
            fraction: 0.0,
            applicable: false,
        }
    }

    fn present(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
            applicable: true,
        }
    }

    #[inline]
    fn percent(&self) -> u8 {
        (self.fraction * 100.0).round() as u8
    }
}

/// Final score for a (user, job) pair
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    /// 0-100
    pub score: u8,
    pub reasons: MatchReasons,
}

/// Calculate a match score (0-100) for a user against a job
///
/// Scoring formula (default weights):
/// score = (
///     skills_fraction * 40 +       # share of required skills the user covers
///     experience_fraction * 25 +   # exact or "any" = 1.0, adjacent level = 0.7
///     location_fraction * 20 +     # region-friendly country = 1.0, otherwise 0.5
///     remote_fraction * 15         # remote job = 1.0
/// ) / denominator * 100
///
/// The denominator depends on `normalization`.
pub fn calculate_match_score(
    user: &User,
    job: &Job,
    weights: &ScoringWeights,
    normalization: Normalization,
) -> MatchScore {
    let (skills, shared_skills) = skills_factor(user.skills.as_deref(), job.required_skills.as_deref());
    let experience = experience_factor(user.experience_level, job.experience_level);
    let location = location_factor(user.location.as_deref(), job.regional_hiring.as_ref());
    let remote = remote_factor(job.is_remote);

    let weighted = [
        (skills, weights.skills),
        (experience, weights.experience),
        (location, weights.location),
        (remote, weights.remote),
    ];

    let achieved: f64 = weighted.iter().map(|(f, w)| f.fraction * w).sum();
    let denominator: f64 = match normalization {
        Normalization::FixedTotal => weights.total(),
        Normalization::ApplicableWeights => weighted
            .iter()
            .filter(|(f, _)| f.applicable)
            .map(|(_, w)| w)
            .sum(),
    };

    let score = if denominator > 0.0 {
        (achieved / denominator * 100.0).round().clamp(0.0, 100.0) as u8
    } else {
        0
    };

    MatchScore {
        score,
        reasons: MatchReasons {
            skills_match: skills.percent(),
            matching_skills: shared_skills,
            experience_match: experience.percent(),
            location_preference: location.percent(),
        },
    }
}

/// Skills factor: covered user skills over the number of required skills
pub fn skills_factor(
    user_skills: Option<&[String]>,
    required_skills: Option<&[String]>,
) -> (FactorScore, Vec<String>) {
    match (user_skills, required_skills) {
        (Some(user), Some(required)) if !user.is_empty() && !required.is_empty() => {
            let shared = matching_skills(user, required);
            let ratio = shared.len() as f64 / required.len().max(1) as f64;
            (FactorScore::present(ratio), shared)
        }
        _ => (FactorScore::missing(), Vec::new()),
    }
}

/// Experience factor: full on exact match or "any", partial on an adjacent level
pub fn experience_factor(
    user_level: Option<ExperienceLevel>,
    job_level: Option<ExperienceLevel>,
) -> FactorScore {
    let (Some(user_level), Some(job_level)) = (user_level, job_level) else {
        return FactorScore::missing();
    };

    if job_level == ExperienceLevel::Any || user_level == job_level {
        return FactorScore::present(1.0);
    }

    match (user_level.rank(), job_level.rank()) {
        (Some(u), Some(j)) if u.abs_diff(j) == 1 => FactorScore::present(ADJACENT_LEVEL_CREDIT),
        _ => FactorScore::present(0.0),
    }
}

/// Location factor: full when the user's country is in a region the job hires from
pub fn location_factor(location: Option<&str>, regions: Option<&RegionalHiring>) -> FactorScore {
    let (Some(location), Some(regions)) = (location, regions) else {
        return FactorScore::missing();
    };
    if location.trim().is_empty() {
        return FactorScore::missing();
    }

    match region_for_location(location) {
        Some(region) if is_region_friendly(regions, region) => FactorScore::present(1.0),
        _ => FactorScore::present(LOCATION_FALLBACK_CREDIT),
    }
}

/// Remote factor: the flag is always known, so this factor always applies
#[inline]
pub fn remote_factor(is_remote: bool) -> FactorScore {
    FactorScore::present(if is_remote { 1.0 } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User {
            id: "user-1".to_string(),
            skills: Some(vec!["React".to_string(), "Node".to_string()]),
            experience_level: Some(ExperienceLevel::Mid),
            location: Some("Lagos, Nigeria".to_string()),
            created_at: None,
        }
    }

    fn create_test_job() -> Job {
        Job {
            id: "job-1".to_string(),
            title: Some("Frontend Engineer".to_string()),
            category: None,
            required_skills: Some(vec!["react".to_string(), "graphql".to_string()]),
            experience_level: Some(ExperienceLevel::Any),
            is_remote: true,
            regional_hiring: Some(RegionalHiring {
                africa_friendly: true,
                ..Default::default()
            }),
            created_at: None,
        }
    }

    #[test]
    fn test_calculate_match_score_full_profile() {
        let result = calculate_match_score(
            &create_test_user(),
            &create_test_job(),
            &ScoringWeights::default(),
            Normalization::FixedTotal,
        );

        assert_eq!(result.score, 80);
        assert_eq!(result.reasons.skills_match, 50);
        assert_eq!(result.reasons.matching_skills, vec!["React"]);
        assert_eq!(result.reasons.experience_match, 100);
        assert_eq!(result.reasons.location_preference, 100);
    }

    #[test]
    fn test_adjacent_level_without_regions() {
        let mut job = create_test_job();
        job.is_remote = false;
        job.experience_level = Some(ExperienceLevel::Senior);
        job.regional_hiring = None;

        let result = calculate_match_score(
            &create_test_user(),
            &job,
            &ScoringWeights::default(),
            Normalization::FixedTotal,
        );

        // 20 + 17.5 + 0 + 0 = 37.5
        assert_eq!(result.score, 38);
        assert_eq!(result.reasons.experience_match, 70);
        assert_eq!(result.reasons.location_preference, 0);
    }

    #[test]
    fn test_applicable_weights_ignore_missing_fields() {
        let mut job = create_test_job();
        job.is_remote = false;
        job.experience_level = Some(ExperienceLevel::Senior);
        job.regional_hiring = None;

        let result = calculate_match_score(
            &create_test_user(),
            &job,
            &ScoringWeights::default(),
            Normalization::ApplicableWeights,
        );

        // 37.5 / 80
        assert_eq!(result.score, 47);
    }

    #[test]
    fn test_experience_factor_levels() {
        use ExperienceLevel::*;

        assert_eq!(experience_factor(Some(Lead), Some(Any)).fraction, 1.0);
        assert_eq!(experience_factor(Some(Senior), Some(Senior)).fraction, 1.0);
        assert_eq!(experience_factor(Some(Entry), Some(Mid)).fraction, 0.7);
        assert_eq!(experience_factor(Some(Lead), Some(Senior)).fraction, 0.7);
        assert_eq!(experience_factor(Some(Entry), Some(Senior)).fraction, 0.0);
        assert!(!experience_factor(None, Some(Senior)).applicable);
    }

    #[test]
    fn test_location_factor_half_credit() {
        let regions = RegionalHiring::default();
        let factor = location_factor(Some("Lagos, Nigeria"), Some(&regions));
        assert_eq!(factor.fraction, 0.5);

        let factor = location_factor(Some("Toronto, Canada"), Some(&regions));
        assert_eq!(factor.fraction, 0.5);

        let factor = location_factor(None, Some(&regions));
        assert!(!factor.applicable);
    }

    #[test]
    fn test_skills_ratio_capped() {
        let user = vec!["React".to_string(), "React Native".to_string()];
        let required = vec!["react".to_string()];
        let (factor, shared) = skills_factor(Some(user.as_slice()), Some(required.as_slice()));
        assert_eq!(factor.fraction, 1.0);
        assert_eq!(shared.len(), 2);
    }

    #[test]
    fn test_no_data_scores_zero() {
        let user = User {
            id: "u".to_string(),
            skills: None,
            experience_level: None,
            location: None,
            created_at: None,
        };
        let job = Job {
            id: "j".to_string(),
            title: None,
            category: None,
            required_skills: None,
            experience_level: None,
            is_remote: false,
            regional_hiring: None,
            created_at: None,
        };

        for normalization in [Normalization::FixedTotal, Normalization::ApplicableWeights] {
            let result = calculate_match_score(&user, &job, &ScoringWeights::default(), normalization);
            assert_eq!(result.score, 0);
            assert_eq!(result.reasons, MatchReasons::default());
        }
    }
}
