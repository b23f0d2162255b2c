//! Provider configuration.
//!
//! Defaults target the public agify / genderize / nationalize endpoints with
//! a single attempt per call and no client-side timeout. Every value can be
//! overridden through `NAMEPROBE_*` environment variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::NameprobeError;

pub const DEFAULT_AGE_URL: &str = "https://api.agify.io";
pub const DEFAULT_GENDER_URL: &str = "https://api.genderize.io";
pub const DEFAULT_NATIONALITY_URL: &str = "https://api.nationalize.io";

/// Endpoints and request policy for the inference services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Age service endpoint
    pub age_url: String,
    /// Gender service endpoint
    pub gender_url: String,
    /// Nationality service endpoint
    pub nationality_url: String,
    /// Optional `apikey` query parameter sent with every call
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Per-request timeout; `None` leaves the transport default (no timeout)
    pub timeout_secs: Option<u64>,
    /// Extra attempts after a retryable failure
    pub max_retries: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            age_url: DEFAULT_AGE_URL.to_string(),
            gender_url: DEFAULT_GENDER_URL.to_string(),
            nationality_url: DEFAULT_NATIONALITY_URL.to_string(),
            api_key: None,
            timeout_secs: None,
            max_retries: 0,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns `NameprobeError::Config` for empty URLs or non-numeric values.
    pub fn from_env() -> Result<Self, NameprobeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `NameprobeError::Config` for empty URLs or non-numeric values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NameprobeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(url) = lookup("NAMEPROBE_AGE_URL") {
            cfg.age_url = url;
        }
        if let Some(url) = lookup("NAMEPROBE_GENDER_URL") {
            cfg.gender_url = url;
        }
        if let Some(url) = lookup("NAMEPROBE_NATIONALITY_URL") {
            cfg.nationality_url = url;
        }
        if let Some(key) = lookup("NAMEPROBE_API_KEY") {
            let key = key.trim().to_string();
            if !key.is_empty() {
                cfg.api_key = Some(key);
            }
        }
        if let Some(raw) = lookup("NAMEPROBE_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                NameprobeError::Config(format!("NAMEPROBE_TIMEOUT_SECS is not a number: {raw:?}"))
            })?;
            cfg.timeout_secs = (secs > 0).then_some(secs);
        }
        if let Some(raw) = lookup("NAMEPROBE_MAX_RETRIES") {
            cfg.max_retries = raw.trim().parse::<u32>().map_err(|_| {
                NameprobeError::Config(format!("NAMEPROBE_MAX_RETRIES is not a number: {raw:?}"))
            })?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that every endpoint is usable.
    ///
    /// # Errors
    /// Returns `NameprobeError::Config` naming the first bad endpoint.
    pub fn validate(&self) -> Result<(), NameprobeError> {
        for (label, url) in [
            ("age", &self.age_url),
            ("gender", &self.gender_url),
            ("nationality", &self.nationality_url),
        ] {
            let url = url.trim();
            if url.is_empty() {
                return Err(NameprobeError::Config(format!("{label} URL is empty")));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(NameprobeError::Config(format!(
                    "{label} URL must start with http:// or https://"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_endpoints(
        mut self,
        age_url: impl Into<String>,
        gender_url: impl Into<String>,
        nationality_url: impl Into<String>,
    ) -> Self {
        self.age_url = age_url.into();
        self.gender_url = gender_url.into();
        self.nationality_url = nationality_url.into();
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Timeout as a `Duration`, if one is set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_single_attempt_without_timeout() {
        let cfg = ProviderConfig::from_lookup(lookup_from(&[])).expect("defaults are valid");
        assert_eq!(cfg, ProviderConfig::default());
        assert_eq!(cfg.max_retries, 0);
        assert!(cfg.timeout().is_none());
        assert_eq!(cfg.age_url, DEFAULT_AGE_URL);
    }

    #[test]
    fn test_overrides() {
        let cfg = ProviderConfig::from_lookup(lookup_from(&[
            ("NAMEPROBE_AGE_URL", "http://localhost:9000/age"),
            ("NAMEPROBE_TIMEOUT_SECS", "5"),
            ("NAMEPROBE_MAX_RETRIES", "2"),
            ("NAMEPROBE_API_KEY", "  abc  "),
        ]))
        .expect("valid overrides");

        assert_eq!(cfg.age_url, "http://localhost:9000/age");
        assert_eq!(cfg.gender_url, DEFAULT_GENDER_URL);
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.max_retries, 2);
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let cfg = ProviderConfig::from_lookup(lookup_from(&[("NAMEPROBE_TIMEOUT_SECS", "0")]))
            .expect("valid");
        assert!(cfg.timeout_secs.is_none());
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = ProviderConfig::from_lookup(lookup_from(&[("NAMEPROBE_MAX_RETRIES", "many")]))
            .unwrap_err();
        assert!(matches!(err, NameprobeError::Config(_)));

        let err = ProviderConfig::from_lookup(lookup_from(&[("NAMEPROBE_GENDER_URL", " ")]))
            .unwrap_err();
        assert!(err.to_string().contains("gender URL is empty"));

        let err = ProviderConfig::from_lookup(lookup_from(&[(
            "NAMEPROBE_NATIONALITY_URL",
            "ftp://example.org",
        )]))
        .unwrap_err();
        assert!(matches!(err, NameprobeError::Config(_)));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let cfg = ProviderConfig::default().with_api_key("secret-value");
        let json = serde_json::to_string(&cfg).expect("serialize");
        assert!(!json.contains("secret-value"));
    }
}
