//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses, bodies, or errors for testing purposes.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response, StreamResponse};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
    /// Timeout requested by the caller
    pub timeout: Option<Duration>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response
    Success(Response),
    /// Fail without a response
    Error(HttpError),
    /// Stream these chunks with the given status, then end the body
    Stream { status: u16, chunks: Vec<Bytes> },
    /// Stream these chunks with status 200 and keep the body open until dropped
    OpenStream(Vec<Bytes>),
    /// Stream these chunks with the given status and keep the body open until dropped
    StalledStream { status: u16, chunks: Vec<Bytes> },
    /// Stream these chunks with status 200, then fail the body read
    BrokenStream { chunks: Vec<Bytes>, error: HttpError },
}

impl MockResponse {
    /// A finished 200 event-stream body.
    pub fn sse(body: impl Into<String>) -> Self {
        MockResponse::Stream {
            status: 200,
            chunks: vec![Bytes::from(body.into())],
        }
    }
}

/// Decrements the live-stream counter when the body is dropped.
struct LiveStreamGuard(Arc<AtomicUsize>);

impl Drop for LiveStreamGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Mock HTTP client for testing.
///
/// This client can be configured to return specific responses for URLs,
/// allowing tests to verify HTTP interactions without network access.
///
/// # Example
///
/// ```ignore
/// use chzzk_bridge_client::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://bridge/api/v1/sse",
///     MockResponse::sse("id: 1\ndata: {\"message\":\"hi\"}\n\n"),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Streamed bodies not yet dropped
    live_streams: Arc<AtomicUsize>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
            live_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set a response for a URL.
    ///
    /// Matched exactly first, then as a prefix (so query strings can vary).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Number of streamed bodies handed out and not yet dropped.
    pub fn live_streams(&self) -> usize {
        self.live_streams.load(Ordering::SeqCst)
    }

    /// Record a request.
    fn record_request(
        &self,
        method: &str,
        url: &str,
        headers: &Headers,
        body: Option<String>,
        timeout: Option<Duration>,
    ) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
            timeout,
        });
    }

    /// Get the response for a URL.
    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        let default = self.default_response.lock().unwrap();
        default.clone()
    }

    /// Wrap a body so its lifetime is visible through [`Self::live_streams`].
    fn track(&self, body: ByteStream) -> ByteStream {
        self.live_streams.fetch_add(1, Ordering::SeqCst);
        let guard = LiveStreamGuard(self.live_streams.clone());
        Box::pin(body.map(move |chunk| {
            let _alive = &guard;
            chunk
        }))
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
        timeout: Option<Duration>,
    ) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()), timeout);

        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(_) => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }

    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<StreamResponse, HttpError> {
        self.record_request("GET", url, headers, None, None);

        let (status, body): (u16, ByteStream) = match self.get_response(url) {
            Some(MockResponse::Stream { status, chunks }) => (
                status,
                Box::pin(futures::stream::iter(chunks.into_iter().map(Ok))),
            ),
            Some(MockResponse::OpenStream(chunks)) => (
                200,
                Box::pin(
                    futures::stream::iter(chunks.into_iter().map(Ok))
                        .chain(futures::stream::pending()),
                ),
            ),
            Some(MockResponse::StalledStream { status, chunks }) => (
                status,
                Box::pin(
                    futures::stream::iter(chunks.into_iter().map(Ok))
                        .chain(futures::stream::pending()),
                ),
            ),
            Some(MockResponse::BrokenStream { chunks, error }) => (
                200,
                Box::pin(
                    futures::stream::iter(chunks.into_iter().map(Ok))
                        .chain(futures::stream::once(async move { Err(error) })),
                ),
            ),
            Some(MockResponse::Success(response)) => (
                response.status,
                Box::pin(futures::stream::once(async move { Ok(response.body) })),
            ),
            Some(MockResponse::Error(err)) => return Err(err),
            None => {
                return Err(HttpError::Other(format!(
                    "No mock response for URL: {}",
                    url
                )))
            }
        };

        Ok(StreamResponse::new(status, Headers::new(), self.track(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_http_client_new() {
        let client = MockHttpClient::new();
        assert!(client.get_requests().is_empty());
        assert_eq!(client.live_streams(), 0);
    }

    #[tokio::test]
    async fn test_post_with_response() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/api",
            MockResponse::Success(Response::new(201, Bytes::from("{}"))),
        );

        let response = client
            .post(
                "https://example.com/api",
                "",
                &Headers::new(),
                Some(Duration::from_secs(3)),
            )
            .await
            .unwrap();

        assert_eq!(response.status, 201);

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].timeout, Some(Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn test_post_with_error() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/error",
            MockResponse::Error(HttpError::Timeout("30s".to_string())),
        );

        let result = client
            .post("https://example.com/error", "", &Headers::new(), None)
            .await;
        assert!(matches!(result, Err(HttpError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_get_stream_with_chunks() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/stream",
            MockResponse::Stream {
                status: 200,
                chunks: vec![Bytes::from("chunk1"), Bytes::from("chunk2")],
            },
        );

        let mut response = client
            .get_stream("https://example.com/stream", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(client.live_streams(), 1);

        let mut chunks = Vec::new();
        while let Some(result) = response.body.next().await {
            chunks.push(result.unwrap());
        }
        assert_eq!(chunks, vec![Bytes::from("chunk1"), Bytes::from("chunk2")]);

        drop(response);
        assert_eq!(client.live_streams(), 0);
    }

    #[tokio::test]
    async fn test_broken_stream_ends_with_error() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/stream",
            MockResponse::BrokenStream {
                chunks: vec![Bytes::from("a")],
                error: HttpError::Io("reset".to_string()),
            },
        );

        let mut response = client
            .get_stream("https://example.com/stream", &Headers::new())
            .await
            .unwrap();
        assert!(response.body.next().await.unwrap().is_ok());
        assert!(matches!(
            response.body.next().await,
            Some(Err(HttpError::Io(_)))
        ));
        assert!(response.body.next().await.is_none());
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let result = client
            .get_stream("https://example.com/missing", &Headers::new())
            .await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_prefix_match_ignores_query() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/api/v1/subscribe",
            MockResponse::Success(Response::new(204, Bytes::new())),
        );

        let response = client
            .post(
                "https://example.com/api/v1/subscribe?uuid=abc",
                "",
                &Headers::new(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(response.status, 204);
    }

    #[tokio::test]
    async fn test_headers_recorded() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::sse(""));

        let mut headers = Headers::new();
        headers.insert("Last-Event-ID".to_string(), "7".to_string());
        let _ = client
            .get_stream("https://example.com/sse", &headers)
            .await
            .unwrap();

        let requests = client.get_requests();
        assert_eq!(requests[0].method, "GET");
        assert_eq!(
            requests[0].headers.get("Last-Event-ID"),
            Some(&"7".to_string())
        );
    }

    #[test]
    fn test_clear_requests() {
        let client = MockHttpClient::new();
        client.record_request("GET", "https://example.com", &Headers::new(), None, None);
        assert_eq!(client.get_requests().len(), 1);

        client.clear_requests();
        assert!(client.get_requests().is_empty());
    }
}
