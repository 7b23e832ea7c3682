//! Reqwest-based HTTP client adapter.
//!
//! This module provides the production HTTP client implementation using
//! reqwest, implementing the [`HttpClient`] trait from `crate::traits`.

use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::traits::{Headers, HttpClient, HttpError, Response, StreamResponse};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use chzzk_bridge_client::adapters::ReqwestHttpClient;
/// use chzzk_bridge_client::ClientConfig;
///
/// let client = ReqwestHttpClient::from_config(&ClientConfig::new("http://localhost:8080"))?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a client honoring the connect timeout and User-Agent of `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(Self::convert_error)?;
        Ok(Self { client })
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Convert an error raised while reading a streamed body.
    fn convert_body_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else {
            HttpError::Io(err.to_string())
        }
    }

    /// Convert reqwest headers to our Headers type.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
        timeout: Option<Duration>,
    ) -> Result<Response, HttpError> {
        let mut builder = self.client.post(url).body(body.to_string());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let builder = Self::apply_headers(builder, headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, response_headers, body))
    }

    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<StreamResponse, HttpError> {
        let builder = Self::apply_headers(self.client.get(url), headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response
            .bytes_stream()
            .map(|result| result.map_err(Self::convert_body_error));

        Ok(StreamResponse::new(status, response_headers, Box::pin(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ReqwestHttpClient {
        let config = ClientConfig::new("http://localhost:8080")
            .with_connect_timeout(Duration::from_secs(1));
        ReqwestHttpClient::from_config(&config).unwrap()
    }

    #[test]
    fn test_reqwest_http_client_from_config() {
        let config = ClientConfig::new("http://localhost:8080").with_user_agent("tail-test/1.0");
        assert!(ReqwestHttpClient::from_config(&config).is_ok());
    }

    #[test]
    fn test_reqwest_http_client_rejects_bad_user_agent() {
        let config = ClientConfig::new("http://localhost:8080").with_user_agent("bad\nagent");
        assert!(matches!(
            ReqwestHttpClient::from_config(&config),
            Err(HttpError::InvalidUrl(_)) | Err(HttpError::Other(_))
        ));
    }

    #[test]
    fn test_convert_headers() {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert(
            reqwest::header::CONTENT_TYPE,
            "text/event-stream".parse().unwrap(),
        );
        header_map.insert(reqwest::header::CONTENT_LENGTH, "100".parse().unwrap());

        let headers = ReqwestHttpClient::convert_headers(&header_map);
        assert_eq!(
            headers.get("content-type"),
            Some(&"text/event-stream".to_string())
        );
        assert_eq!(headers.get("content-length"), Some(&"100".to_string()));
    }

    #[tokio::test]
    async fn test_post_invalid_url() {
        let client = client();
        let result = client
            .post("not-a-valid-url", "", &Headers::new(), None)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_post_connection_refused() {
        let client = client();
        let result = client
            .post("http://127.0.0.1:59999/test", "", &Headers::new(), None)
            .await;
        assert!(matches!(
            result,
            Err(HttpError::ConnectionFailed(_)) | Err(HttpError::Other(_))
        ));
    }

    #[tokio::test]
    async fn test_get_stream_connection_refused() {
        let client = client();
        let result = client
            .get_stream("http://127.0.0.1:59999/test", &Headers::new())
            .await;
        assert!(result.is_err());
    }
}
