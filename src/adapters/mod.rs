//! Adapters layer: Concrete implementations of ports.
//!
//! - `http`: reqwest client for the public inference services
//! - `sanitize`: name/secret filtering for logs

pub mod http;
pub mod sanitize;

pub use http::HttpProvider;
