//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (POST, streaming GET)

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response, StreamResponse};
