//! HTTP client trait abstraction.
//!
//! Provides a trait-based abstraction for the two kinds of exchange the
//! bridge API needs (plain POST and streaming GET), enabling dependency
//! injection and mocking in tests.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::Stream;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::Instant;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Incrementally received response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Create a new response with headers.
    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

}

/// Response whose body is still being received.
pub struct StreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Body chunks as they arrive. Dropping it releases the connection.
    pub body: ByteStream,
}

impl StreamResponse {
    pub fn new(status: u16, headers: Headers, body: ByteStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Read the start of an error body, replacing invalid UTF-8.
    ///
    /// Stops after `limit` bytes, when `wait` has elapsed, at the end of the
    /// body, or at the first read failure, whichever comes first. The rest of
    /// the body is dropped with the response.
    pub async fn excerpt(mut self, limit: usize, wait: Duration) -> String {
        let deadline = Instant::now() + wait;
        let mut buf = BytesMut::new();
        while buf.len() < limit {
            match tokio::time::timeout_at(deadline, self.body.next()).await {
                Ok(Some(Ok(chunk))) => buf.extend_from_slice(&chunk),
                _ => break,
            }
        }
        buf.truncate(limit);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Failure to get any answer from the server.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HttpError {
    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
    /// IO error while reading a body
    #[error("IO error: {0}")]
    Io(String),
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Other error
    #[error("HTTP error: {0}")]
    Other(String),
}

impl HttpError {
    /// Check if retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HttpError::ConnectionFailed(_) | HttpError::Timeout(_) | HttpError::Io(_)
        )
    }
}

/// Trait for HTTP client operations.
///
/// Implementations include the production reqwest-based client and a mock
/// client for testing. Non-2xx statuses are answers, not errors: both
/// methods only fail when no response could be obtained.
///
/// # Example
///
/// ```ignore
/// use chzzk_bridge_client::traits::{Headers, HttpClient};
///
/// async fn subscribe_status<C: HttpClient>(client: &C) -> Option<u16> {
///     let url = "http://localhost:8080/api/v1/subscribe?uuid=..";
///     match client.post(url, "", &Headers::new(), None).await {
///         Ok(response) => Some(response.status),
///         Err(_) => None,
///     }
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a POST request and buffer the whole response.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `body` - Request body as a string
    /// * `headers` - Request headers
    /// * `timeout` - Bound on the whole exchange, `None` for the client default
    async fn post(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
        timeout: Option<Duration>,
    ) -> Result<Response, HttpError>;

    /// Perform a GET request and return as soon as the headers arrive.
    ///
    /// Used for Server-Sent Events, where the body never ends on its own.
    /// No timeout applies to the body.
    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<StreamResponse, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_new() {
        let response = Response::new(200, Bytes::from("Hello"));
        assert_eq!(response.status, 200);
        assert!(response.headers.is_empty());
        assert_eq!(response.body, Bytes::from("Hello"));
    }

    #[test]
    fn test_response_with_headers() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let response = Response::with_headers(200, headers, Bytes::from("{}"));
        assert_eq!(
            response.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
    }

    const WAIT: Duration = Duration::from_secs(5);

    fn stream_response(chunks: Vec<Result<Bytes, HttpError>>) -> StreamResponse {
        StreamResponse::new(404, Headers::new(), Box::pin(futures::stream::iter(chunks)))
    }

    #[tokio::test]
    async fn test_stream_response_excerpt() {
        let response = stream_response(vec![Ok(Bytes::from("not ")), Ok(Bytes::from("found"))]);
        assert_eq!(response.excerpt(1024, WAIT).await, "not found");
    }

    #[tokio::test]
    async fn test_stream_response_excerpt_is_truncated() {
        let response = stream_response(vec![Ok(Bytes::from("0123456789")), Ok(Bytes::from("more"))]);
        assert_eq!(response.excerpt(4, WAIT).await, "0123");
    }

    #[tokio::test]
    async fn test_stream_response_excerpt_stops_at_deadline() {
        let body = futures::stream::iter(vec![Ok(Bytes::from("busy"))]).chain(futures::stream::pending());
        let response = StreamResponse::new(503, Headers::new(), Box::pin(body));

        let excerpt = tokio::time::timeout(
            WAIT,
            response.excerpt(1024, Duration::from_millis(100)),
        )
        .await
        .expect("excerpt returns once its wait has elapsed");
        assert_eq!(excerpt, "busy");
    }

    #[tokio::test]
    async fn test_stream_response_excerpt_stops_at_error() {
        let chunks = vec![
            Ok(Bytes::from("partial")),
            Err(HttpError::Io("reset".to_string())),
            Ok(Bytes::from("never read")),
        ];
        assert_eq!(stream_response(chunks).excerpt(1024, WAIT).await, "partial");
    }

    #[test]
    fn test_http_error_display() {
        assert_eq!(
            HttpError::ConnectionFailed("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(
            HttpError::Timeout("30s".to_string()).to_string(),
            "Request timeout: 30s"
        );
        assert_eq!(
            HttpError::Io("read failed".to_string()).to_string(),
            "IO error: read failed"
        );
        assert_eq!(
            HttpError::InvalidUrl("bad url".to_string()).to_string(),
            "Invalid URL: bad url"
        );
        assert_eq!(
            HttpError::Other("unknown".to_string()).to_string(),
            "HTTP error: unknown"
        );
    }

    #[test]
    fn test_http_error_retryable() {
        assert!(HttpError::Timeout("t".to_string()).is_retryable());
        assert!(HttpError::ConnectionFailed("c".to_string()).is_retryable());
        assert!(!HttpError::InvalidUrl("u".to_string()).is_retryable());
    }
}
