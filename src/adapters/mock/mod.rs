//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses and bodies

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
