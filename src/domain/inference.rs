//! Aggregated inference result types.
//!
//! Represents the combined output of the age, gender and nationality
//! lookups for a single name.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// User-visible message for any failed lookup.
pub const GENERIC_FAILURE_MESSAGE: &str = "Error fetching data. Please try again.";

/// Gender estimate as reported by the gender service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

/// One (country code, likelihood) pair from the nationality service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryProbability {
    /// ISO 3166-1 alpha-2 code as returned by the provider
    #[serde(rename = "country_id")]
    pub country_code: String,

    /// Likelihood in [0, 1]
    pub probability: f64,
}

impl CountryProbability {
    #[must_use]
    pub fn new(country_code: impl Into<String>, probability: f64) -> Self {
        Self {
            country_code: country_code.into(),
            probability,
        }
    }
}

/// Sort entries by probability, highest first.
///
/// The sort is stable: entries with equal probability keep the order the
/// provider returned them in.
pub fn sort_by_probability(countries: &mut [CountryProbability]) {
    countries.sort_by(|a, b| descending(a.probability, b.probability));
}

fn descending(a: f64, b: f64) -> Ordering {
    // Fold -0.0 into 0.0 and sink NaN so the order stays total.
    fn rank(p: f64) -> f64 {
        if p.is_nan() {
            f64::NEG_INFINITY
        } else {
            p + 0.0
        }
    }
    rank(b).total_cmp(&rank(a))
}

/// Combined result of the three lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Estimated age, if the provider knows one
    pub age: Option<u32>,

    /// Estimated gender, if the provider knows one
    pub gender: Option<Gender>,

    /// Probable nationalities, most likely first
    pub countries: Vec<CountryProbability>,
}

impl InferenceResult {
    /// Compose a result from the three provider answers.
    ///
    /// `age` and `gender` are taken verbatim; `countries` is sorted.
    #[must_use]
    pub fn compose(
        age: Option<u32>,
        gender: Option<Gender>,
        mut countries: Vec<CountryProbability>,
    ) -> Self {
        sort_by_probability(&mut countries);
        Self {
            age,
            gender,
            countries,
        }
    }

    /// The most likely country, if any.
    #[must_use]
    pub fn top_country(&self) -> Option<&CountryProbability> {
        self.countries.first()
    }
}

/// Why an aggregation attempt failed, in user-safe terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    message: String,
}

impl FailureReason {
    /// The generic "try again" reason used for every upstream failure.
    #[must_use]
    pub fn generic() -> Self {
        Self {
            message: GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for FailureReason {
    fn default() -> Self {
        Self::generic()
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of one aggregation attempt. There is no partial-success variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum OperationOutcome {
    Success(InferenceResult),
    Failure(FailureReason),
}

impl OperationOutcome {
    #[must_use]
    pub fn failure() -> Self {
        Self::Failure(FailureReason::generic())
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Borrow the result on success.
    #[must_use]
    pub fn result(&self) -> Option<&InferenceResult> {
        match self {
            Self::Success(result) => Some(result),
            Self::Failure(_) => None,
        }
    }

    /// Convert into a standard `Result`.
    ///
    /// # Errors
    /// Returns the failure reason when the outcome is `Failure`.
    pub fn into_result(self) -> Result<InferenceResult, FailureReason> {
        match self {
            Self::Success(result) => Ok(result),
            Self::Failure(reason) => Err(reason),
        }
    }
}
