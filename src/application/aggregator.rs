//! Aggregator: joins the three lookups into one outcome.
//!
//! This service coordinates:
//! - Concurrent age / gender / nationality lookups
//! - A single fail-fast join
//! - Result composition (country list sorted by probability)

use std::sync::Arc;

use crate::adapters::HttpProvider;
use crate::config::ProviderConfig;
use crate::domain::{InferenceResult, OperationOutcome, Query};
use crate::ports::{NameInferenceProvider, ProviderError};
use crate::NameprobeError;

/// Service for running one name lookup against a provider.
pub struct InferenceAggregator<P>
where
    P: NameInferenceProvider,
{
    provider: Arc<P>,
}

impl<P> InferenceAggregator<P>
where
    P: NameInferenceProvider,
{
    /// Create a new aggregator.
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run the three lookups and compose the result.
    ///
    /// The lookups run concurrently. The first failure wins and the other
    /// in-flight calls are dropped.
    ///
    /// # Errors
    /// Returns the first `ProviderError` raised by any lookup.
    pub async fn try_infer(&self, query: &Query) -> Result<InferenceResult, ProviderError> {
        let (age, gender, countries) = tokio::try_join!(
            self.provider.estimate_age(query),
            self.provider.estimate_gender(query),
            self.provider.estimate_nationality(query),
        )?;

        Ok(InferenceResult::compose(age, gender, countries))
    }

    /// Run one lookup and collapse any failure into the generic outcome.
    pub async fn infer(&self, query: &Query) -> OperationOutcome {
        tracing::info!("Starting lookup (name length {})", query.char_len());

        match self.try_infer(query).await {
            Ok(result) => {
                tracing::info!(
                    "Lookup complete: age={}, gender={}, countries={}",
                    result.age.is_some(),
                    result.gender.is_some(),
                    result.countries.len()
                );
                OperationOutcome::Success(result)
            }
            Err(e) => {
                tracing::warn!("Lookup failed: {}", e);
                OperationOutcome::failure()
            }
        }
    }
}

/// Build an HTTP-backed aggregator and run a single lookup.
///
/// # Errors
/// Returns `NameprobeError::Query` for an empty name and
/// `NameprobeError::Config` if the provider cannot be built. Upstream
/// failures are reported through the returned outcome, not as errors.
pub async fn lookup_once(
    config: ProviderConfig,
    name: &str,
) -> Result<OperationOutcome, NameprobeError> {
    let query = Query::new(name)?;
    let provider = Arc::new(HttpProvider::new(config)?);
    let aggregator = InferenceAggregator::new(provider);
    Ok(aggregator.infer(&query).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::FakeProvider;
    use crate::domain::{CountryProbability, Gender, GENERIC_FAILURE_MESSAGE};
    use crate::ports::Service;
    use std::time::Duration;

    fn query(name: &str) -> Query {
        Query::new(name).expect("valid query")
    }

    fn aggregator(provider: FakeProvider) -> InferenceAggregator<FakeProvider> {
        InferenceAggregator::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_field_passthrough() {
        let agg = aggregator(
            FakeProvider::answering(
                Some(34),
                Some(Gender::Female),
                vec![
                    CountryProbability::new("NG", 0.8),
                    CountryProbability::new("US", 0.15),
                ],
            ),
        );

        let outcome = agg.infer(&query("ada")).await;
        let result = outcome.into_result().expect("success");

        assert_eq!(result.age, Some(34));
        assert_eq!(result.gender, Some(Gender::Female));
        assert_eq!(
            result.countries,
            vec![
                CountryProbability::new("NG", 0.8),
                CountryProbability::new("US", 0.15),
            ]
        );
    }

    #[tokio::test]
    async fn test_countries_sorted_stably() {
        let agg = aggregator(FakeProvider::answering(
            None,
            None,
            vec![
                CountryProbability::new("PT", 0.1),
                CountryProbability::new("BR", 0.4),
                CountryProbability::new("AO", 0.1),
                CountryProbability::new("ES", 0.4),
            ],
        ));

        let result = agg.try_infer(&query("joao")).await.expect("success");
        let codes: Vec<&str> = result
            .countries
            .iter()
            .map(|c| c.country_code.as_str())
            .collect();
        assert_eq!(codes, vec!["BR", "ES", "PT", "AO"]);
    }

    #[tokio::test]
    async fn test_empty_country_list_is_success() {
        let agg = aggregator(FakeProvider::answering(Some(20), None, vec![]));
        let outcome = agg.infer(&query("x")).await;
        assert_eq!(outcome.result().map(|r| r.countries.len()), Some(0));
    }

    #[tokio::test]
    async fn test_nulls_preserved_in_success() {
        let agg = aggregator(FakeProvider::answering(None, None, vec![]));
        let result = agg.infer(&query("qwxz")).await.into_result().expect("success");
        assert_eq!(result.age, None);
        assert_eq!(result.gender, None);
    }

    #[tokio::test]
    async fn test_any_single_failure_fails_whole_lookup() {
        for failing in [Service::Age, Service::Gender, Service::Nationality] {
            let agg = aggregator(
                FakeProvider::answering(
                    Some(30),
                    Some(Gender::Male),
                    vec![CountryProbability::new("DE", 0.5)],
                )
                .failing(failing),
            );

            let outcome = agg.infer(&query("karl")).await;
            assert_eq!(outcome, OperationOutcome::failure(), "{failing} failure");
            assert!(outcome.result().is_none());
            assert_eq!(
                outcome.into_result().unwrap_err().message(),
                GENERIC_FAILURE_MESSAGE
            );
        }
    }

    #[tokio::test]
    async fn test_try_infer_reports_cause() {
        let agg = aggregator(FakeProvider::answering(None, None, vec![]).failing(Service::Gender));
        let err = agg.try_infer(&query("sam")).await.unwrap_err();
        assert_eq!(err.service(), Service::Gender);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookups_run_concurrently() {
        let delay = Duration::from_millis(300);
        let agg = aggregator(
            FakeProvider::answering(Some(1), Some(Gender::Male), vec![]).with_delay(delay),
        );

        let started = tokio::time::Instant::now();
        let outcome = agg.infer(&query("li")).await;

        assert!(outcome.is_success());
        assert!(started.elapsed() < delay * 2, "took {:?}", started.elapsed());
        assert_eq!(agg.provider().calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_failure_does_not_wait_for_others() {
        let agg = aggregator(
            FakeProvider::answering(Some(1), None, vec![])
                .with_delay(Duration::from_secs(30))
                .failing_immediately(Service::Age),
        );

        let started = tokio::time::Instant::now();
        let outcome = agg.infer(&query("li")).await;

        assert!(!outcome.is_success());
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_lookup_once_rejects_empty_name() {
        let err = lookup_once(ProviderConfig::default(), "  ").await.unwrap_err();
        assert!(matches!(err, NameprobeError::Query(_)));
    }
}
