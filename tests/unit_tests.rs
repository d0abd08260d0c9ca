// Unit tests for jobmatch scoring

use jobmatch::core::{
    filters::{matching_skills, region_for_location, Region},
    scoring::{calculate_match_score, experience_factor, remote_factor},
    Matcher,
};
use jobmatch::models::{ExperienceLevel, Job, Normalization, RegionalHiring, ScoringWeights, User};

fn skills(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}

fn user(level: Option<ExperienceLevel>, location: Option<&str>) -> User {
    User {
        id: "user-1".to_string(),
        skills: skills(&["React", "Node"]),
        experience_level: level,
        location: location.map(str::to_string),
        created_at: None,
    }
}

fn job(level: Option<ExperienceLevel>, is_remote: bool, regions: Option<RegionalHiring>) -> Job {
    Job {
        id: "job-1".to_string(),
        title: Some("Frontend Engineer".to_string()),
        category: Some("engineering".to_string()),
        required_skills: skills(&["react", "graphql"]),
        experience_level: level,
        is_remote,
        regional_hiring: regions,
        created_at: None,
    }
}

fn africa() -> Option<RegionalHiring> {
    Some(RegionalHiring {
        africa_friendly: true,
        ..Default::default()
    })
}

fn score(user: &User, job: &Job) -> u8 {
    calculate_match_score(user, job, &ScoringWeights::default(), Normalization::FixedTotal).score
}

#[test]
fn test_remote_region_friendly_match() {
    let u = user(Some(ExperienceLevel::Mid), Some("Lagos, Nigeria"));
    let j = job(Some(ExperienceLevel::Any), true, africa());

    let result = calculate_match_score(&u, &j, &ScoringWeights::default(), Normalization::FixedTotal);

    assert_eq!(result.score, 80);
    assert_eq!(result.reasons.skills_match, 50);
    assert_eq!(result.reasons.matching_skills, vec!["React".to_string()]);
    assert_eq!(result.reasons.experience_match, 100);
    assert_eq!(result.reasons.location_preference, 100);
}

#[test]
fn test_onsite_senior_without_region_data() {
    let u = user(Some(ExperienceLevel::Mid), None);
    let j = job(Some(ExperienceLevel::Senior), false, None);

    let result = calculate_match_score(&u, &j, &ScoringWeights::default(), Normalization::FixedTotal);

    assert_eq!(result.score, 38);
    assert_eq!(result.reasons.experience_match, 70);
    assert_eq!(result.reasons.location_preference, 0);
}

fn weights(skills: f64, experience: f64, location: f64, remote: f64) -> ScoringWeights {
    ScoringWeights {
        skills,
        experience,
        location,
        remote,
    }
}

fn perfect_pair() -> (User, Job) {
    let mut u = user(Some(ExperienceLevel::Mid), Some("Lagos, Nigeria"));
    u.skills = skills(&["React", "GraphQL"]);
    (u, job(Some(ExperienceLevel::Mid), true, africa()))
}

fn hopeless_pair() -> (User, Job) {
    let mut u = user(Some(ExperienceLevel::Lead), Some("Paris, France"));
    u.skills = skills(&["Excel"]);
    let mut j = job(Some(ExperienceLevel::Entry), false, None);
    j.required_skills = skills(&["rust"]);
    (u, j)
}

#[test]
fn test_score_extremes_for_any_positive_weights() {
    let (good_user, good_job) = perfect_pair();
    let (bad_user, bad_job) = hopeless_pair();

    for w in [
        ScoringWeights::default(),
        weights(1.0, 2.0, 3.0, 4.0),
        weights(10.0, 0.0, 0.0, 0.0),
        weights(0.5, 0.25, 0.125, 0.125),
    ] {
        for normalization in [Normalization::FixedTotal, Normalization::ApplicableWeights] {
            assert_eq!(calculate_match_score(&good_user, &good_job, &w, normalization).score, 100);
            assert_eq!(calculate_match_score(&bad_user, &bad_job, &w, normalization).score, 0);
        }
    }
}

#[test]
fn test_score_clamped_into_range() {
    // Remote job with nothing else matching and a negative remote weight
    let (u, mut j) = hopeless_pair();
    j.is_remote = true;
    let low = calculate_match_score(&u, &j, &weights(40.0, 25.0, 20.0, -50.0), Normalization::FixedTotal);
    assert_eq!(low.score, 0);

    // Everything but remote matches and remote weighs against the total
    let (u, mut j) = perfect_pair();
    j.is_remote = false;
    let high = calculate_match_score(&u, &j, &weights(40.0, 25.0, 20.0, -30.0), Normalization::FixedTotal);
    assert_eq!(high.score, 100);
}

#[test]
fn test_applicable_weights_never_below_fixed_total() {
    let skill_sets = [None, skills(&[]), skills(&["React"]), skills(&["React", "GraphQL", "CSS"])];
    let levels = [None, Some(ExperienceLevel::Entry), Some(ExperienceLevel::Senior), Some(ExperienceLevel::Any)];
    let locations = [None, Some("Lagos, Nigeria"), Some("Recife, Brazil"), Some("Berlin, Germany")];
    let regions = [
        None,
        africa(),
        Some(RegionalHiring {
            latam_friendly: true,
            asia_friendly: true,
            ..Default::default()
        }),
    ];
    let weight_sets = [ScoringWeights::default(), weights(1.0, 2.0, 3.0, 4.0), weights(70.0, 10.0, 10.0, 0.0)];

    for user_skills in &skill_sets {
        for level in levels {
            for location in locations {
                for region in &regions {
                    for is_remote in [true, false] {
                        let mut u = user(Some(ExperienceLevel::Mid), location);
                        u.skills = user_skills.clone();
                        let j = job(level, is_remote, region.clone());

                        for w in &weight_sets {
                            let fixed = calculate_match_score(&u, &j, w, Normalization::FixedTotal).score;
                            let applicable =
                                calculate_match_score(&u, &j, w, Normalization::ApplicableWeights).score;
                            assert!(
                                fixed <= applicable,
                                "fixed {} > applicable {} for {:?} / {:?}",
                                fixed,
                                applicable,
                                u,
                                j
                            );
                            assert!(applicable <= 100);
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_any_level_gives_full_experience_credit() {
    for level in [
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Lead,
    ] {
        let factor = experience_factor(Some(level), Some(ExperienceLevel::Any));
        assert_eq!(factor.fraction, 1.0);
    }
}

#[test]
fn test_remote_flag_worth_its_weight() {
    let u = user(Some(ExperienceLevel::Mid), Some("Lagos, Nigeria"));
    let remote = score(&u, &job(Some(ExperienceLevel::Mid), true, africa()));
    let onsite = score(&u, &job(Some(ExperienceLevel::Mid), false, africa()));

    assert_eq!(remote_factor(false).fraction, 0.0);
    assert_eq!(remote - onsite, 15);
}

#[test]
fn test_unmapped_country_gets_half_location_credit() {
    let u = user(Some(ExperienceLevel::Mid), Some("Berlin, Germany"));
    let j = job(Some(ExperienceLevel::Mid), true, africa());

    let result = calculate_match_score(&u, &j, &ScoringWeights::default(), Normalization::FixedTotal);

    assert_eq!(result.reasons.location_preference, 50);
    assert_eq!(result.score, 70);
}

#[test]
fn test_empty_skills_are_ignored() {
    let required = vec!["react".to_string(), "graphql".to_string()];
    let with_blank = vec!["".to_string(), "  ".to_string(), "React".to_string()];

    assert_eq!(matching_skills(&with_blank, &required), vec!["React".to_string()]);
}

#[test]
fn test_country_regions() {
    assert_eq!(region_for_location("Abuja, Nigeria"), Some(Region::Africa));
    assert_eq!(region_for_location("Jakarta, INDONESIA"), Some(Region::Asia));
    assert_eq!(region_for_location("São Paulo, Brazil"), Some(Region::Latam));
    assert_eq!(region_for_location("Toronto, Canada"), None);
}

#[test]
fn test_missing_inputs_under_both_normalizations() {
    let empty_user = User {
        id: "user-2".to_string(),
        skills: None,
        experience_level: None,
        location: None,
        created_at: None,
    };
    let j = job(Some(ExperienceLevel::Mid), true, None);

    let fixed = calculate_match_score(&empty_user, &j, &ScoringWeights::default(), Normalization::FixedTotal);
    let applicable =
        calculate_match_score(&empty_user, &j, &ScoringWeights::default(), Normalization::ApplicableWeights);

    // Only the remote factor applies
    assert_eq!(fixed.score, 15);
    assert_eq!(applicable.score, 100);
}

#[test]
fn test_matcher_sweep_applies_floor() {
    let matcher = Matcher::with_default_weights();
    let u = user(Some(ExperienceLevel::Mid), Some("Lagos, Nigeria"));

    let mut strong = job(Some(ExperienceLevel::Mid), true, africa());
    strong.id = "strong".to_string();
    let mut good = job(Some(ExperienceLevel::Any), true, africa());
    good.id = "good".to_string();
    good.required_skills = skills(&["react", "graphql", "css", "html"]);
    let mut weak = job(Some(ExperienceLevel::Senior), false, None);
    weak.id = "weak".to_string();

    let matches = matcher.match_user_against_jobs(&u, &[weak, good, strong], 60);

    let ids: Vec<&str> = matches.iter().map(|m| m.job_id.as_str()).collect();
    assert_eq!(ids, vec!["good", "strong"]);
    assert!(matches.iter().all(|m| m.match_score >= 60));
    assert!(matches.iter().all(|m| m.user_id == "user-1"));
}
