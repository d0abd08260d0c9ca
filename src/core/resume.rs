//! Resume analysis: model-backed structured extraction with a heuristic fallback.
//!
//! The model is asked for a JSON object matching [`ResumeProfile`]. Its reply is decoded
//! strictly; when the call or the decode fails, [`heuristic_extract`] produces the same
//! shape from the raw text and the result is flagged as low confidence.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ExperienceLevel;
use crate::services::llm::{LlmClient, LlmMessage};

const RESUME_SYSTEM: &str = "You are a resume parser for a remote job marketplace. \
Reply with a single JSON object and nothing else.";

const RESUME_PROMPT_TEMPLATE: &str = r#"Extract the candidate profile from the resume below.

Return JSON with exactly these keys:
{
  "full_name": string or null,
  "email": string or null,
  "phone": string or null,
  "location": string or null,
  "skills": [string],
  "experience_level": "entry" | "mid" | "senior" | "lead" | null,
  "years_of_experience": number or null,
  "summary": string or null
}

Resume:
{resume_text}"#;

/// Technologies recognised by the fallback extractor, in display spelling
const SKILL_VOCABULARY: &[&str] = &[
    "JavaScript", "TypeScript", "Python", "Java", "Kotlin", "Swift", "Go", "Rust", "Ruby",
    "PHP", "C#", "C++", "SQL", "PostgreSQL", "MySQL", "MongoDB", "Redis", "GraphQL", "REST",
    "React", "Angular", "Vue", "Next.js", "Node.js", "Django", "Flask", "Spring", "Rails",
    "Laravel", "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Terraform", "Linux", "Git",
    "HTML", "CSS", "Tailwind", "Figma", "Machine Learning", "Data Analysis", "Excel",
    "Project Management", "Agile", "Scrum", "SEO", "Copywriting", "Customer Support",
];

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Resume text is empty")]
    EmptyText,
}

/// Structured candidate profile extracted from a resume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResumeProfile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub years_of_experience: Option<f32>,
    pub summary: Option<String>,
}

/// Where a profile came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    Model,
    Heuristic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

/// Result of a resume analysis; always the same shape whichever path produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub profile: ResumeProfile,
    pub source: ExtractionSource,
    pub confidence: Confidence,
}

/// Analyze a resume, preferring the model and falling back to text heuristics
pub async fn analyze_resume(resume_text: &str, llm: &LlmClient) -> Result<ResumeAnalysis, ResumeError> {
    if resume_text.trim().is_empty() {
        return Err(ResumeError::EmptyText);
    }

    let prompt = RESUME_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);

    match llm.complete(RESUME_SYSTEM, &[LlmMessage::user(prompt)]).await {
        Ok(reply) => match decode_model_output(&reply) {
            Ok(profile) => {
                return Ok(ResumeAnalysis {
                    profile,
                    source: ExtractionSource::Model,
                    confidence: Confidence::High,
                })
            }
            Err(e) => tracing::warn!("Model resume output did not match schema: {}", e),
        },
        Err(e) => tracing::warn!("Resume model call failed, using heuristics: {}", e),
    }

    Ok(ResumeAnalysis {
        profile: heuristic_extract(resume_text),
        source: ExtractionSource::Heuristic,
        confidence: Confidence::Low,
    })
}

/// Decode a model reply into a profile
///
/// Tolerates code fences and prose around the object; the object itself must match the schema.
pub fn decode_model_output(reply: &str) -> Result<ResumeProfile, serde_json::Error> {
    let text = strip_json_fences(reply);
    let candidate = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    };
    serde_json::from_str(candidate)
}

fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped.strip_suffix("```").map(str::trim).unwrap_or(stripped)
        }
        None => text,
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap())
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\+?\d[\d\s().-]{7,}\d").unwrap())
}

fn years_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d{1,2})\+?\s*(?:years?|yrs?)").unwrap())
}

fn location_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)^\s*(?:location|address|based in)\s*[:\-]\s*(.+?)\s*$").unwrap())
}

/// Best-effort profile extraction from raw resume text
pub fn heuristic_extract(resume_text: &str) -> ResumeProfile {
    let email = email_re().find(resume_text).map(|m| m.as_str().to_string());
    let phone = phone_re()
        .find(resume_text)
        .map(|m| m.as_str().trim().to_string());

    let years_of_experience = years_re()
        .captures_iter(resume_text)
        .filter_map(|c| c.get(1)?.as_str().parse::<f32>().ok())
        .fold(None, |max: Option<f32>, y| Some(max.map_or(y, |m| m.max(y))));

    let location = location_re()
        .captures(resume_text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let full_name = resume_text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .filter(|line| looks_like_name(line))
        .map(str::to_string);

    ResumeProfile {
        full_name,
        email,
        phone,
        location,
        skills: detect_skills(resume_text),
        experience_level: years_of_experience.map(level_for_years),
        years_of_experience,
        summary: None,
    }
}

fn looks_like_name(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words.iter().all(|w| {
            w.chars().next().is_some_and(char::is_uppercase)
                && w.chars().all(|c| c.is_alphabetic() || c == '-' || c == '.')
        })
}

fn detect_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    SKILL_VOCABULARY
        .iter()
        .filter(|skill| contains_term(&lower, &skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect()
}

/// Whole-term containment: the term may not be glued to other letters or digits
fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + term.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn level_for_years(years: f32) -> ExperienceLevel {
    match years {
        y if y < 2.0 => ExperienceLevel::Entry,
        y if y < 5.0 => ExperienceLevel::Mid,
        y if y < 9.0 => ExperienceLevel::Senior,
        _ => ExperienceLevel::Lead,
    }
}
