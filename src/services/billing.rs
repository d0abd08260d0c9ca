use chrono::{DateTime, Utc};
use moka::future::Cache;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the billing API
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Billing API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Subscription state of one user for the configured entitlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    pub user_id: String,
    pub is_active: bool,
    pub entitlement: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct SubscriberEnvelope {
    subscriber: Subscriber,
}

#[derive(Debug, Deserialize)]
struct Subscriber {
    #[serde(default)]
    entitlements: HashMap<String, Entitlement>,
}

#[derive(Debug, Deserialize)]
struct Entitlement {
    #[serde(default)]
    expires_date: Option<DateTime<Utc>>,
}

/// Billing API client
///
/// Built once at startup and shared through application state. Statuses are kept
/// in an in-memory TTL cache so page loads do not hit the billing API every time.
pub struct BillingClient {
    api_url: String,
    api_key: String,
    entitlement: String,
    client: Client,
    cache: Cache<String, SubscriptionStatus>,
}

impl BillingClient {
    pub fn new(
        api_url: String,
        api_key: String,
        entitlement: String,
        cache_size: u64,
        cache_ttl: Duration,
        timeout: Duration,
    ) -> Result<Self, BillingError> {
        let client = Client::builder().timeout(timeout).build()?;

        let cache = moka::future::CacheBuilder::new(cache_size)
            .time_to_live(cache_ttl)
            .build();

        Ok(Self {
            api_url,
            api_key,
            entitlement,
            client,
            cache,
        })
    }

    /// Current subscription status, served from cache when fresh
    pub async fn subscription_status(&self, user_id: &str) -> Result<SubscriptionStatus, BillingError> {
        if let Some(status) = self.cache.get(user_id).await {
            tracing::trace!("Subscription cache hit: {}", user_id);
            return Ok(status);
        }

        let status = self.fetch_status(user_id).await?;
        self.cache.insert(user_id.to_string(), status.clone()).await;

        Ok(status)
    }

    /// Drop a cached status, e.g. after a purchase webhook
    pub async fn invalidate(&self, user_id: &str) {
        self.cache.invalidate(user_id).await;
    }

    async fn fetch_status(&self, user_id: &str) -> Result<SubscriptionStatus, BillingError> {
        let url = format!(
            "{}/subscribers/{}",
            self.api_url.trim_end_matches('/'),
            urlencoding::encode(user_id)
        );

        tracing::debug!("Fetching subscription status for user: {}", user_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(self.inactive(user_id));
        }

        if !response.status().is_success() {
            return Err(BillingError::ApiError(format!(
                "Failed to fetch subscriber: {}",
                response.status()
            )));
        }

        let envelope: SubscriberEnvelope = response
            .json()
            .await
            .map_err(|e| BillingError::InvalidResponse(e.to_string()))?;

        let Some(entitlement) = envelope.subscriber.entitlements.get(&self.entitlement) else {
            return Ok(self.inactive(user_id));
        };

        // No expiry date means a lifetime entitlement
        let is_active = entitlement
            .expires_date
            .map_or(true, |expires| expires > Utc::now());

        Ok(SubscriptionStatus {
            user_id: user_id.to_string(),
            is_active,
            entitlement: self.entitlement.clone(),
            expires_at: entitlement.expires_date,
        })
    }

    fn inactive(&self, user_id: &str) -> SubscriptionStatus {
        SubscriptionStatus {
            user_id: user_id.to_string(),
            is_active: false,
            entitlement: self.entitlement.clone(),
            expires_at: None,
        }
    }
}
