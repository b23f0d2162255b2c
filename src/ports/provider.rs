//! Inference provider port: Trait for the three name lookups.
//!
//! This trait abstracts the public inference services from the aggregator so
//! the join logic can be exercised without a network.

use async_trait::async_trait;

use crate::domain::{CountryProbability, Gender, Query};

/// Which upstream lookup a call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Age,
    Gender,
    Nationality,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Age => write!(f, "age"),
            Self::Gender => write!(f, "gender"),
            Self::Nationality => write!(f, "nationality"),
        }
    }
}

/// Error from a single provider call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("{service} lookup: transport error: {message}")]
    Transport { service: Service, message: String },

    #[error("{service} lookup timed out")]
    Timeout { service: Service },

    #[error("{service} lookup returned HTTP {status}")]
    Status { service: Service, status: u16 },

    #[error("{service} lookup returned a malformed payload: {detail}")]
    Malformed { service: Service, detail: String },
}

impl ProviderError {
    /// The lookup that failed.
    #[must_use]
    pub fn service(&self) -> Service {
        match self {
            Self::Transport { service, .. }
            | Self::Timeout { service }
            | Self::Status { service, .. }
            | Self::Malformed { service, .. } => *service,
        }
    }

    /// Whether another attempt could succeed.
    ///
    /// Transport failures, timeouts, rate limiting and server errors are
    /// retryable. Client errors and malformed payloads are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Malformed { .. } => false,
        }
    }
}

/// Trait for the name inference services.
///
/// Each method is one independent lookup keyed by the query. A provider may
/// legitimately not know an answer, which is `Ok(None)` (or an empty list),
/// not an error.
#[async_trait]
pub trait NameInferenceProvider: Send + Sync {
    /// Estimate the age for a name.
    ///
    /// # Errors
    /// Returns `ProviderError` if the call fails or the payload is malformed.
    async fn estimate_age(&self, query: &Query) -> Result<Option<u32>, ProviderError>;

    /// Estimate the gender for a name.
    ///
    /// # Errors
    /// Returns `ProviderError` if the call fails or the payload is malformed.
    async fn estimate_gender(&self, query: &Query) -> Result<Option<Gender>, ProviderError>;

    /// Estimate the nationality distribution for a name, in provider order.
    ///
    /// # Errors
    /// Returns `ProviderError` if the call fails or the payload is malformed.
    async fn estimate_nationality(
        &self,
        query: &Query,
    ) -> Result<Vec<CountryProbability>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let svc = Service::Age;
        assert!(ProviderError::Timeout { service: svc }.is_retryable());
        assert!(ProviderError::Transport {
            service: svc,
            message: "reset".into()
        }
        .is_retryable());
        assert!(ProviderError::Status { service: svc, status: 503 }.is_retryable());
        assert!(ProviderError::Status { service: svc, status: 429 }.is_retryable());
        assert!(!ProviderError::Status { service: svc, status: 404 }.is_retryable());
        assert!(!ProviderError::Malformed {
            service: svc,
            detail: "bad".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_error_display_names_service() {
        let err = ProviderError::Status {
            service: Service::Nationality,
            status: 500,
        };
        assert_eq!(err.to_string(), "nationality lookup returned HTTP 500");
        assert_eq!(err.service(), Service::Nationality);
    }
}
