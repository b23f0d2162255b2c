//! Domain layer: Core types for a name lookup.
//!
//! Pure Rust types with no I/O. All types are serializable and validate on
//! construction where an invariant exists.

pub mod country;
mod inference;
mod query;

pub use country::{country_name, display_name};
pub use inference::{
    sort_by_probability, CountryProbability, FailureReason, Gender, InferenceResult,
    OperationOutcome, GENERIC_FAILURE_MESSAGE,
};
pub use query::{Query, QueryError};
