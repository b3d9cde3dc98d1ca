use crate::error::NovaPayError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Simulated backend latencies, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyProfile {
    pub login_ms: u64,
    pub email_verification_ms: u64,
    pub processing_ms: u64,
    pub statement_load_ms: u64,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            login_ms: 1_800,
            email_verification_ms: 1_500,
            processing_ms: 2_000,
            statement_load_ms: 1_500,
        }
    }
}

impl LatencyProfile {
    pub fn instant() -> Self {
        Self {
            login_ms: 0,
            email_verification_ms: 0,
            processing_ms: 0,
            statement_load_ms: 0,
        }
    }

    /// Multiplies every latency by `factor`. Negative or non-finite factors are rejected.
    pub fn scaled(self, factor: f64) -> Result<Self, NovaPayError> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(NovaPayError::Config(format!(
                "latency scale must be a non-negative number, got {factor}"
            )));
        }
        let scale = |ms: u64| (ms as f64 * factor).round() as u64;
        Ok(Self {
            login_ms: scale(self.login_ms),
            email_verification_ms: scale(self.email_verification_ms),
            processing_ms: scale(self.processing_ms),
            statement_load_ms: scale(self.statement_load_ms),
        })
    }

    pub fn login(&self) -> Duration {
        Duration::from_millis(self.login_ms)
    }

    pub fn email_verification(&self) -> Duration {
        Duration::from_millis(self.email_verification_ms)
    }

    pub fn processing(&self) -> Duration {
        Duration::from_millis(self.processing_ms)
    }

    pub fn statement_load(&self) -> Duration {
        Duration::from_millis(self.statement_load_ms)
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NovaPayConfig {
    pub latency: LatencyProfile,
}

impl NovaPayConfig {
    pub fn from_json(raw: &str) -> Result<Self, NovaPayError> {
        serde_json::from_str(raw).map_err(|e| NovaPayError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_timings() {
        let profile = LatencyProfile::default();
        assert_eq!(profile.login(), Duration::from_millis(1_800));
        assert_eq!(profile.email_verification(), Duration::from_millis(1_500));
        assert_eq!(profile.processing(), Duration::from_secs(2));
        assert_eq!(profile.statement_load(), Duration::from_millis(1_500));
    }

    #[test]
    fn scaling_rounds_and_rejects_negative_factors() {
        let half = LatencyProfile::default().scaled(0.5).unwrap();
        assert_eq!(half.login_ms, 900);
        assert_eq!(half.processing_ms, 1_000);
        assert!(LatencyProfile::default().scaled(-1.0).is_err());
        assert!(LatencyProfile::default().scaled(f64::NAN).is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = NovaPayConfig::from_json(r#"{"latency":{"login_ms":10}}"#).unwrap();
        assert_eq!(config.latency.login_ms, 10);
        assert_eq!(config.latency.processing_ms, 2_000);
        assert!(NovaPayConfig::from_json("{not json").is_err());
    }
}
