//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the aggregator and the public inference services.

mod provider;

pub use provider::{NameInferenceProvider, ProviderError, Service};
