//! In-memory provider for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{CountryProbability, Gender, Query};
use crate::ports::{NameInferenceProvider, ProviderError, Service};

/// Scripted provider: fixed answers, optional delay, optional failure.
pub(crate) struct FakeProvider {
    age: Option<u32>,
    gender: Option<Gender>,
    countries: Vec<CountryProbability>,
    delay: Duration,
    failing: Option<Service>,
    fail_immediately: bool,
    panicking: Option<Service>,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub(crate) fn answering(
        age: Option<u32>,
        gender: Option<Gender>,
        countries: Vec<CountryProbability>,
    ) -> Self {
        Self {
            age,
            gender,
            countries,
            delay: Duration::ZERO,
            failing: None,
            fail_immediately: false,
            panicking: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail `service` after the configured delay.
    pub(crate) fn failing(mut self, service: Service) -> Self {
        self.failing = Some(service);
        self.fail_immediately = false;
        self
    }

    /// Fail `service` without waiting for the delay.
    pub(crate) fn failing_immediately(mut self, service: Service) -> Self {
        self.failing = Some(service);
        self.fail_immediately = true;
        self
    }

    pub(crate) fn panicking(mut self, service: Service) -> Self {
        self.panicking = Some(service);
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn step(&self, service: Service) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let error = ProviderError::Transport {
            service,
            message: "scripted failure".to_string(),
        };
        if self.failing == Some(service) && self.fail_immediately {
            return Err(error);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.panicking == Some(service) {
            panic!("scripted panic in {service} lookup");
        }
        if self.failing == Some(service) {
            return Err(error);
        }
        Ok(())
    }
}

#[async_trait]
impl NameInferenceProvider for FakeProvider {
    async fn estimate_age(&self, _query: &Query) -> Result<Option<u32>, ProviderError> {
        self.step(Service::Age).await?;
        Ok(self.age)
    }

    async fn estimate_gender(&self, _query: &Query) -> Result<Option<Gender>, ProviderError> {
        self.step(Service::Gender).await?;
        Ok(self.gender)
    }

    async fn estimate_nationality(
        &self,
        _query: &Query,
    ) -> Result<Vec<CountryProbability>, ProviderError> {
        self.step(Service::Nationality).await?;
        Ok(self.countries.clone())
    }
}
