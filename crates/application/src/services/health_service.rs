//! Provider readiness checks
//!
//! Probes every configured strategy provider with a timeout and reports
//! the individual status of each one.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use super::pronunciation_service::Providers;

/// Default timeout for a single readiness probe in seconds
const DEFAULT_HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// Status of an individual provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Whether the provider is usable
    pub healthy: bool,
    /// Provider identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    /// Response time in milliseconds (if check completed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    /// Create a healthy status with the provider identifier
    #[must_use]
    pub fn healthy_with_info(info: impl Into<String>) -> Self {
        Self {
            healthy: true,
            info: Some(info.into()),
            response_time_ms: None,
            error: None,
        }
    }

    /// Create an unhealthy status
    #[must_use]
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            info: None,
            response_time_ms: None,
            error: Some(error.into()),
        }
    }

    /// Create an unhealthy status due to timeout
    #[must_use]
    pub fn timeout() -> Self {
        Self::unhealthy("Health check timed out")
    }

    /// Attach the provider identifier
    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Add response time to the status
    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }
}

/// Readiness of all configured providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessReport {
    /// True if every provider is healthy
    pub ready: bool,
    /// Status per capability (`transcription`, `phonemizer`, `feedback`, `synthesis`)
    pub providers: BTreeMap<String, ServiceHealth>,
}

impl ReadinessReport {
    /// Create a report from individual statuses
    #[must_use]
    pub fn new(providers: BTreeMap<String, ServiceHealth>) -> Self {
        let ready = providers.values().all(|s| s.healthy);
        Self { ready, providers }
    }

    /// Get status of a specific capability
    #[must_use]
    pub fn provider_status(&self, capability: &str) -> Option<&ServiceHealth> {
        self.providers.get(capability)
    }
}

/// Service probing the availability of the strategy providers
#[derive(Debug, Clone)]
pub struct HealthService {
    providers: Providers,
    timeout: Duration,
}

impl HealthService {
    /// Create a health service with the default probe timeout
    #[must_use]
    pub fn new(providers: Providers) -> Self {
        Self {
            providers,
            timeout: Duration::from_secs(DEFAULT_HEALTH_CHECK_TIMEOUT_SECS),
        }
    }

    /// Set the probe timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check every provider
    #[instrument(skip(self))]
    pub async fn check_all(&self) -> ReadinessReport {
        let p = &self.providers;
        let (transcription, phonemizer, feedback, synthesis) = tokio::join!(
            self.probe(
                p.transcription.provider_name(),
                p.transcription.is_available()
            ),
            self.probe(p.phonemizer.provider_name(), p.phonemizer.is_available()),
            self.probe(p.feedback.provider_name(), p.feedback.is_available()),
            self.probe(p.synthesis.provider_name(), p.synthesis.is_available()),
        );

        let mut providers = BTreeMap::new();
        providers.insert("transcription".to_string(), transcription);
        providers.insert("phonemizer".to_string(), phonemizer);
        providers.insert("feedback".to_string(), feedback);
        providers.insert("synthesis".to_string(), synthesis);
        ReadinessReport::new(providers)
    }

    async fn probe(
        &self,
        name: &'static str,
        check: impl Future<Output = bool> + Send,
    ) -> ServiceHealth {
        let start = Instant::now();

        let Ok(available) = timeout(self.timeout, check).await else {
            warn!(provider = name, "Readiness check timed out");
            return ServiceHealth::timeout().with_info(name);
        };

        #[allow(clippy::cast_possible_truncation)]
        let response_time = start.elapsed().as_millis() as u64;
        if available {
            debug!(provider = name, response_time_ms = response_time, "Provider ready");
            ServiceHealth::healthy_with_info(name).with_response_time(response_time)
        } else {
            warn!(provider = name, response_time_ms = response_time, "Provider unavailable");
            ServiceHealth::unhealthy("Provider unavailable")
                .with_info(name)
                .with_response_time(response_time)
        }
    }
}
