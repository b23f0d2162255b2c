//! Application layer: Use cases and services.
//!
//! This module orchestrates domain types with the provider port to
//! implement the lookup use case and the form's session state.

mod aggregator;
mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregator::{lookup_once, InferenceAggregator};
pub use session::{LookupSession, RequestTicket, RequestTracker};
