use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::core::SweepSettings;
use crate::services::StoreTables;
use crate::models::{Normalization, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub store: StoreSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub billing: BillingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub url: String,
    pub service_key: String,
    #[serde(default)]
    pub tables: StoreTables,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_quality_floor")]
    pub quality_floor: u8,
    #[serde(default = "default_user_sweep_days")]
    pub user_sweep_days: i64,
    #[serde(default = "default_job_sweep_days")]
    pub job_sweep_days: i64,
    #[serde(default = "default_batch_window_days")]
    pub batch_window_days: i64,
    #[serde(default = "default_batch_job_limit")]
    pub batch_job_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            quality_floor: default_quality_floor(),
            user_sweep_days: default_user_sweep_days(),
            job_sweep_days: default_job_sweep_days(),
            batch_window_days: default_batch_window_days(),
            batch_job_limit: default_batch_job_limit(),
        }
    }
}

impl From<&MatchingSettings> for SweepSettings {
    fn from(value: &MatchingSettings) -> Self {
        Self {
            quality_floor: value.quality_floor,
            user_sweep_days: value.user_sweep_days,
            job_sweep_days: value.job_sweep_days,
            batch_window_days: value.batch_window_days,
            batch_job_limit: value.batch_job_limit,
        }
    }
}

fn default_quality_floor() -> u8 { 60 }
fn default_user_sweep_days() -> i64 { 30 }
fn default_job_sweep_days() -> i64 { 60 }
fn default_batch_window_days() -> i64 { 7 }
fn default_batch_job_limit() -> usize { 50 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub normalization: Normalization,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skills_weight")]
    pub skills: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_remote_weight")]
    pub remote: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skills: default_skills_weight(),
            experience: default_experience_weight(),
            location: default_location_weight(),
            remote: default_remote_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(value: &WeightsConfig) -> Self {
        Self {
            skills: value.skills,
            experience: value.experience,
            location: value.location,
            remote: value.remote,
        }
    }
}

fn default_skills_weight() -> f64 { 40.0 }
fn default_experience_weight() -> f64 { 25.0 }
fn default_location_weight() -> f64 { 20.0 }
fn default_remote_weight() -> f64 { 15.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_llm_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key: String::new(),
            model: default_llm_model(),
            max_tokens: default_llm_max_tokens(),
            max_retries: default_llm_max_retries(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

fn default_llm_base_url() -> String { "https://api.anthropic.com".to_string() }
fn default_llm_model() -> String { "claude-sonnet-4-5".to_string() }
fn default_llm_max_tokens() -> u32 { 2048 }
fn default_llm_max_retries() -> u32 { 2 }
fn default_llm_timeout_secs() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct BillingSettings {
    #[serde(default = "default_billing_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_entitlement")]
    pub entitlement: String,
    #[serde(default = "default_billing_cache_size")]
    pub cache_size: u64,
    #[serde(default = "default_billing_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            api_url: default_billing_api_url(),
            api_key: String::new(),
            entitlement: default_entitlement(),
            cache_size: default_billing_cache_size(),
            cache_ttl_secs: default_billing_cache_ttl_secs(),
        }
    }
}

fn default_billing_api_url() -> String { "https://api.revenuecat.com/v1".to_string() }
fn default_entitlement() -> String { "premium".to_string() }
fn default_billing_cache_size() -> u64 { 10_000 }
fn default_billing_cache_ttl_secs() -> u64 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with JOBMATCH_)
    /// 5. Well-known secret variables (STORE_URL, STORE_SERVICE_KEY, LLM_API_KEY, BILLING_API_KEY)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., JOBMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("JOBMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings, |name| std::env::var(name).ok())?;

        settings.try_deserialize()
    }
}

/// Secrets commonly provided by the hosting platform under their own names
const SECRET_OVERRIDES: &[(&str, &str)] = &[
    ("STORE_URL", "store.url"),
    ("STORE_SERVICE_KEY", "store.service_key"),
    ("LLM_API_KEY", "llm.api_key"),
    ("BILLING_API_KEY", "billing.api_key"),
];

/// Layer well-known secret variables over the loaded configuration
fn substitute_env_vars<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    for (var, key) in SECRET_OVERRIDES {
        if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
            builder = builder.set_override(*key, value)?;
        }
    }

    builder.build()
}
