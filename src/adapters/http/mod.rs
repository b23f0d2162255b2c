//! HTTP adapter for the agify / genderize / nationalize services.
//!
//! Each lookup is a single `GET {endpoint}?name={name}` returning JSON.
//! The name is URL-encoded by reqwest. Errors are stripped of the request
//! URL before they leave this module so the name never ends up in a message.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::domain::{CountryProbability, Gender, Query};
use crate::ports::{NameInferenceProvider, ProviderError, Service};
use crate::NameprobeError;

/// Base delay between retry attempts; doubles per attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);
const RETRY_MAX_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
struct AgeResponse {
    #[serde(default)]
    age: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenderResponse {
    #[serde(default)]
    gender: Option<Gender>,
}

#[derive(Debug, Deserialize)]
struct NationalityResponse {
    country: Vec<CountryProbability>,
}

/// Provider backed by the public inference services.
pub struct HttpProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl HttpProvider {
    /// Build a provider from configuration.
    ///
    /// # Errors
    /// Returns `NameprobeError::Config` if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, NameprobeError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("nameprobe/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| NameprobeError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint(&self, service: Service) -> &str {
        match service {
            Service::Age => &self.config.age_url,
            Service::Gender => &self.config.gender_url,
            Service::Nationality => &self.config.nationality_url,
        }
    }

    /// Fetch and decode, retrying retryable failures up to `max_retries` times.
    async fn get_json<T>(&self, service: Service, query: &Query) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        let max_attempts = self.config.max_retries.saturating_add(1);
        let mut attempt = 1;

        loop {
            match self.fetch_once(service, query).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = retry_delay(attempt);
                    tracing::debug!(
                        "{} lookup attempt {}/{} failed ({}), retrying in {:?}",
                        service,
                        attempt,
                        max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once<T>(&self, service: Service, query: &Query) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .get(self.endpoint(service))
            .query(&[("name", query.as_str())]);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("apikey", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_error(service, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                service,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                ProviderError::Malformed {
                    service,
                    detail: e.without_url().to_string(),
                }
            } else {
                map_error(service, e)
            }
        })
    }
}

fn map_error(service: Service, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout { service }
    } else {
        ProviderError::Transport {
            service,
            message: err.without_url().to_string(),
        }
    }
}

fn retry_delay(attempt: u32) -> Duration {
    let factor = 1u32 << attempt.saturating_sub(1).min(4);
    (RETRY_BASE_DELAY * factor).min(RETRY_MAX_DELAY)
}

/// Reject probabilities a provider should never send.
fn validate_countries(countries: &[CountryProbability]) -> Result<(), ProviderError> {
    for entry in countries {
        if !entry.probability.is_finite() || !(0.0..=1.0).contains(&entry.probability) {
            return Err(ProviderError::Malformed {
                service: Service::Nationality,
                detail: format!(
                    "probability {} for {} is outside [0, 1]",
                    entry.probability, entry.country_code
                ),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl NameInferenceProvider for HttpProvider {
    async fn estimate_age(&self, query: &Query) -> Result<Option<u32>, ProviderError> {
        let body: AgeResponse = self.get_json(Service::Age, query).await?;
        Ok(body.age)
    }

    async fn estimate_gender(&self, query: &Query) -> Result<Option<Gender>, ProviderError> {
        let body: GenderResponse = self.get_json(Service::Gender, query).await?;
        Ok(body.gender)
    }

    async fn estimate_nationality(
        &self,
        query: &Query,
    ) -> Result<Vec<CountryProbability>, ProviderError> {
        let body: NationalityResponse = self.get_json(Service::Nationality, query).await?;
        validate_countries(&body.country)?;
        Ok(body.country)
    }
}
