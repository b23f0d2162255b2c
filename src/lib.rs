//! # Nameprobe
//!
//! Name-based demographic inference: estimate the age, gender and likely
//! nationalities for a first name by querying three public services
//! concurrently and merging their answers.
//!
//! This crate provides:
//! - A provider port with an HTTP adapter for agify / genderize / nationalize
//! - A fail-fast aggregator that collapses every failure into one message
//! - Terminal UI for interactive lookups
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (Query, InferenceResult, country names)
//! - `ports`: Trait definitions for the lookup services
//! - `adapters`: Concrete implementations (reqwest HTTP client, log sanitizer)
//! - `application`: Aggregation use case and form session state
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::ProviderConfig;
pub use domain::{CountryProbability, Gender, InferenceResult, OperationOutcome, Query};

/// Result type for Nameprobe operations
pub type Result<T> = std::result::Result<T, NameprobeError>;

/// Main error type for Nameprobe
#[derive(Debug, thiserror::Error)]
pub enum NameprobeError {
    #[error("Invalid query: {0}")]
    Query(#[from] domain::QueryError),

    #[error("Lookup failed: {0}")]
    Provider(#[from] ports::ProviderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
