use crate::models::RegionalHiring;

/// Hiring regions a job can declare itself friendly to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Africa,
    Asia,
    Latam,
}

/// Countries recognised in a free-text location, with the region they belong to
const COUNTRY_REGIONS: &[(&str, Region)] = &[
    ("nigeria", Region::Africa),
    ("indonesia", Region::Asia),
    ("brazil", Region::Latam),
];

/// User skills that overlap at least one required skill
///
/// Two skills overlap when either one contains the other, ignoring case.
/// Returned in the user's original spelling and order.
pub fn matching_skills(user_skills: &[String], required_skills: &[String]) -> Vec<String> {
    let required: Vec<String> = required_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    user_skills
        .iter()
        .filter(|skill| {
            let skill_lower = skill.trim().to_lowercase();
            !skill_lower.is_empty()
                && required.iter().any(|req| {
                    req.contains(skill_lower.as_str()) || skill_lower.contains(req.as_str())
                })
        })
        .cloned()
        .collect()
}

/// Detect a recognised country in a location string
#[inline]
pub fn region_for_location(location: &str) -> Option<Region> {
    let location = location.to_lowercase();
    COUNTRY_REGIONS
        .iter()
        .find(|(country, _)| location.contains(country))
        .map(|(_, region)| *region)
}

/// Whether the job declared itself open to hiring from the region
#[inline]
pub fn is_region_friendly(regions: &RegionalHiring, region: Region) -> bool {
    match region {
        Region::Africa => regions.africa_friendly,
        Region::Asia => regions.asia_friendly,
        Region::Latam => regions.latam_friendly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matching_skills_case_insensitive() {
        let found = matching_skills(&skills(&["React", "Node"]), &skills(&["react", "graphql"]));
        assert_eq!(found, vec!["React"]);
    }

    #[test]
    fn test_matching_skills_substring_both_directions() {
        // "Node" is inside "node.js", "TypeScript" contains "script"
        let found = matching_skills(
            &skills(&["Node", "TypeScript"]),
            &skills(&["node.js", "script"]),
        );
        assert_eq!(found, vec!["Node", "TypeScript"]);
    }

    #[test]
    fn test_matching_skills_empty_inputs() {
        assert!(matching_skills(&[], &skills(&["rust"])).is_empty());
        assert!(matching_skills(&skills(&["", " "]), &skills(&["rust"])).is_empty());
        assert!(matching_skills(&skills(&["rust"]), &[]).is_empty());
    }

    #[test]
    fn test_region_detection() {
        assert_eq!(region_for_location("Lagos, Nigeria"), Some(Region::Africa));
        assert_eq!(region_for_location("JAKARTA, INDONESIA"), Some(Region::Asia));
        assert_eq!(region_for_location("São Paulo, Brazil"), Some(Region::Latam));
        assert_eq!(region_for_location("Berlin, Germany"), None);
    }

    #[test]
    fn test_region_friendly_flags() {
        let regions = RegionalHiring {
            asia_friendly: true,
            ..Default::default()
        };
        assert!(is_region_friendly(&regions, Region::Asia));
        assert!(!is_region_friendly(&regions, Region::Africa));
    }
}
