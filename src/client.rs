//! Bridge API client.
//!
//! [`BridgeClient`] wraps the three bridge endpoints: subscribe, unsubscribe,
//! and the per-channel SSE stream. The HTTP transport is pluggable through
//! [`HttpClient`]; by default it is [`ReqwestHttpClient`].

use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::BridgeResult;
use crate::models::{ChatMessage, SubscriptionOutcome};
use crate::session::{open_stream, ErrorHandler, SseHandle, StreamSession};
use crate::sse::{message_stream, MessageStream};
use crate::traits::{Headers, HttpClient};

pub const SUBSCRIBE_PATH: &str = "/api/v1/subscribe";
pub const UNSUBSCRIBE_PATH: &str = "/api/v1/unsubscribe";
pub const SSE_PATH: &str = "/api/v1/sse";

/// Client for the chat bridge.
///
/// Cheap to clone; clones share the configuration and the HTTP client.
#[derive(Clone)]
pub struct BridgeClient {
    config: Arc<ClientConfig>,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BridgeClient {
    /// Create a client with default timeouts.
    pub fn new(base_url: impl Into<String>) -> BridgeResult<Self> {
        Self::with_config(ClientConfig::new(base_url))
    }

    /// Create a client backed by reqwest.
    pub fn with_config(config: ClientConfig) -> BridgeResult<Self> {
        let http = ReqwestHttpClient::from_config(&config)?;
        Ok(Self::with_http_client(config, http))
    }

    /// Create a client over any transport.
    pub fn with_http_client(config: ClientConfig, http: impl HttpClient + 'static) -> Self {
        Self {
            config: Arc::new(config),
            http: Arc::new(http),
        }
    }

    /// Normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Register interest in a channel.
    ///
    /// Every HTTP answer maps to an outcome; only a missing answer or an
    /// undecodable 401 body is an error.
    pub async fn subscribe(&self, channel: Uuid) -> BridgeResult<SubscriptionOutcome> {
        let url = self.config.endpoint(SUBSCRIBE_PATH, channel);
        tracing::debug!(%channel, %url, "subscribing");

        let response = self
            .http
            .post(&url, "", &Headers::new(), Some(self.config.subscribe_timeout))
            .await?;

        let outcome = SubscriptionOutcome::from_response(response.status, &response.body)?;
        match &outcome {
            SubscriptionOutcome::Success => tracing::info!(%channel, "subscribed"),
            SubscriptionOutcome::AlreadySubscribed => {
                tracing::debug!(%channel, "already subscribed")
            }
            SubscriptionOutcome::AuthRequired { path, .. } => {
                tracing::info!(%channel, %path, "authorization required")
            }
            SubscriptionOutcome::Error { status } => {
                tracing::warn!(%channel, status, "subscribe failed")
            }
        }
        Ok(outcome)
    }

    /// [`subscribe`](Self::subscribe) on its own task.
    pub fn subscribe_async(&self, channel: Uuid) -> JoinHandle<BridgeResult<SubscriptionOutcome>> {
        let client = self.clone();
        tokio::spawn(async move { client.subscribe(channel).await })
    }

    /// Drop interest in a channel.
    ///
    /// `Ok(true)` iff the server removed a subscription. Unsubscribing a
    /// channel with no subscription is `Ok(false)`.
    pub async fn unsubscribe(&self, channel: Uuid) -> BridgeResult<bool> {
        let url = self.config.endpoint(UNSUBSCRIBE_PATH, channel);
        tracing::debug!(%channel, %url, "unsubscribing");

        let response = self
            .http
            .post(&url, "", &Headers::new(), Some(self.config.unsubscribe_timeout))
            .await?;

        let removed = response.status == 200;
        tracing::debug!(%channel, status = response.status, removed, "unsubscribe answered");
        Ok(removed)
    }

    /// [`unsubscribe`](Self::unsubscribe) on its own task.
    pub fn unsubscribe_async(&self, channel: Uuid) -> JoinHandle<BridgeResult<bool>> {
        let client = self.clone();
        tokio::spawn(async move { client.unsubscribe(channel).await })
    }

    /// Prepare a stream session without sending anything yet.
    pub fn session(&self, channel: Uuid, last_event_id: Option<i64>) -> StreamSession {
        let url = self.config.endpoint(SSE_PATH, channel);
        StreamSession::new(self.http.clone(), url, last_event_id)
    }

    /// Stream a channel's messages until the stream ends or fails.
    ///
    /// To stop it from elsewhere, use [`session`](Self::session) and keep its
    /// handle.
    pub async fn stream_events<M>(
        &self,
        channel: Uuid,
        last_event_id: Option<i64>,
        on_message: M,
        on_error: Option<ErrorHandler>,
    ) -> BridgeResult<()>
    where
        M: FnMut(ChatMessage) + Send,
    {
        self.session(channel, last_event_id)
            .with_error_handler(on_error)
            .run(on_message)
            .await
    }

    /// Stream a channel's messages on a background task.
    ///
    /// Returns at once. Open failures and stream failures go to `on_error`
    /// unless the returned handle was closed first.
    pub fn stream_events_async<M>(
        &self,
        channel: Uuid,
        last_event_id: Option<i64>,
        on_message: M,
        on_error: Option<ErrorHandler>,
    ) -> SseHandle
    where
        M: FnMut(ChatMessage) + Send + 'static,
    {
        let session = self
            .session(channel, last_event_id)
            .with_error_handler(on_error);
        let handle = session.handle();
        tokio::spawn(session.run_detached(on_message));
        handle
    }

    /// Open the stream and return its messages as a lazy stream.
    ///
    /// Dropping the stream closes the connection.
    pub async fn messages(
        &self,
        channel: Uuid,
        last_event_id: Option<i64>,
    ) -> BridgeResult<MessageStream> {
        let url = self.config.endpoint(SSE_PATH, channel);
        let body = open_stream(self.http.as_ref(), &url, last_event_id).await?;
        Ok(message_stream(body))
    }
}
