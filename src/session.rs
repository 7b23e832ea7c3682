//! Stream sessions: one SSE connection, its parser, and its cancellation handle.

use futures_util::StreamExt;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::{BridgeError, BridgeResult, StreamError};
use crate::models::{ChatMessage, NO_MESSAGE_ID};
use crate::sse::message_stream;
use crate::traits::{ByteStream, Headers, HttpClient};

/// Content type requested from the stream endpoint.
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// Request header carrying the resumption hint.
pub const LAST_EVENT_ID_HEADER: &str = "Last-Event-ID";

/// Most bytes of a rejected stream's body kept in [`BridgeError::StreamOpen`].
pub const ERROR_BODY_LIMIT: usize = 4 * 1024;

/// Longest wait for a rejected stream's body.
pub const ERROR_BODY_WAIT: Duration = Duration::from_secs(2);

/// Callback receiving errors that do not end the caller's control flow.
pub type ErrorHandler = Box<dyn FnMut(BridgeError) + Send>;

/// Lifecycle of a stream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    /// Request sent, no response yet
    Connecting = 0,
    /// 200 received, messages flowing
    Open = 1,
    /// Ended, failed, or closed by the caller
    Closed = 2,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Open,
            _ => ConnectionState::Closed,
        }
    }
}

#[derive(Debug)]
struct HandleState {
    /// Set once, by the caller
    closed: AtomicBool,
    state: AtomicU8,
    last_delivered_id: AtomicI64,
    cancel: CancellationToken,
}

/// Shared view of a running stream session.
///
/// Cheap to clone; every clone refers to the same session. Closing from any
/// clone stops the session's read loop, drops the response body, and
/// suppresses errors caused by the interruption.
#[derive(Debug, Clone)]
pub struct SseHandle {
    inner: Arc<HandleState>,
}

impl SseHandle {
    fn new() -> Self {
        Self {
            inner: Arc::new(HandleState {
                closed: AtomicBool::new(false),
                state: AtomicU8::new(ConnectionState::Connecting as u8),
                last_delivered_id: AtomicI64::new(NO_MESSAGE_ID),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Stop the session. Idempotent.
    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.cancel.cancel();
        self.set_state(ConnectionState::Closed);
        tracing::debug!("sse handle closed by caller");
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.inner.state.load(Ordering::Acquire))
    }

    /// Id of the last message handed to the message handler, for resuming.
    pub fn last_delivered_id(&self) -> Option<i64> {
        let id = self.inner.last_delivered_id.load(Ordering::Acquire);
        (id != NO_MESSAGE_ID).then_some(id)
    }

    /// Resolves once the handle is closed.
    pub async fn closed(&self) {
        self.inner.cancel.cancelled().await
    }

    fn set_state(&self, state: ConnectionState) {
        self.inner.state.store(state as u8, Ordering::Release);
    }

    /// Connecting -> Open. Fails if the session was closed meanwhile.
    fn mark_open(&self) -> bool {
        self.inner
            .state
            .compare_exchange(
                ConnectionState::Connecting as u8,
                ConnectionState::Open as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    fn record_delivered(&self, id: i64) {
        self.inner.last_delivered_id.store(id, Ordering::Release);
    }
}

/// Send the stream request and check its status.
///
/// Only a 200 body is returned. Any other status fails with
/// [`BridgeError::StreamOpen`], carrying at most [`ERROR_BODY_LIMIT`] bytes of
/// the body read within [`ERROR_BODY_WAIT`].
pub(crate) async fn open_stream(
    http: &dyn HttpClient,
    url: &str,
    last_event_id: Option<i64>,
) -> BridgeResult<ByteStream> {
    let mut headers = Headers::new();
    headers.insert("Accept".to_string(), EVENT_STREAM_CONTENT_TYPE.to_string());
    if let Some(id) = last_event_id {
        headers.insert(LAST_EVENT_ID_HEADER.to_string(), id.to_string());
    }

    tracing::debug!(url, ?last_event_id, "opening sse stream");
    let response = http.get_stream(url, &headers).await?;

    if response.status != 200 {
        let status = response.status;
        let body = response.excerpt(ERROR_BODY_LIMIT, ERROR_BODY_WAIT).await;
        tracing::warn!(url, status, "sse stream rejected");
        return Err(BridgeError::StreamOpen { status, body });
    }

    Ok(response.body)
}

/// One streaming connection, from request to close.
///
/// Created by [`BridgeClient::session`](crate::BridgeClient::session).
/// Grab a [`handle`](Self::handle) before calling [`run`](Self::run) to be
/// able to stop it from elsewhere.
pub struct StreamSession {
    http: Arc<dyn HttpClient>,
    url: String,
    last_event_id: Option<i64>,
    handle: SseHandle,
    on_error: Option<ErrorHandler>,
}

impl StreamSession {
    pub(crate) fn new(http: Arc<dyn HttpClient>, url: String, last_event_id: Option<i64>) -> Self {
        Self {
            http,
            url,
            last_event_id,
            handle: SseHandle::new(),
            on_error: None,
        }
    }

    /// Handle shared with the running session.
    pub fn handle(&self) -> SseHandle {
        self.handle.clone()
    }

    /// Stream endpoint this session reads.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resumption hint sent with the request.
    pub fn last_event_id(&self) -> Option<i64> {
        self.last_event_id
    }

    /// Receive per-frame errors (undecodable frames, handler panics).
    pub fn on_error(mut self, handler: impl FnMut(BridgeError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    pub(crate) fn with_error_handler(mut self, handler: Option<ErrorHandler>) -> Self {
        self.on_error = handler;
        self
    }

    /// Stream until the body ends, fails, or the handle is closed.
    ///
    /// Returns `Ok(())` when the server ends the stream or the caller closes
    /// the handle, and `Err` when the stream could not be opened or the
    /// connection failed. Frame errors go to the error handler.
    pub async fn run<M>(mut self, mut on_message: M) -> BridgeResult<()>
    where
        M: FnMut(ChatMessage) + Send,
    {
        self.run_inner(&mut on_message).await
    }

    /// Like [`run`](Self::run), but terminal errors go to the error handler.
    pub(crate) async fn run_detached<M>(mut self, mut on_message: M)
    where
        M: FnMut(ChatMessage) + Send,
    {
        if let Err(err) = self.run_inner(&mut on_message).await {
            tracing::warn!(
                url = %self.url(),
                last_event_id = ?self.last_event_id(),
                error = %err,
                "sse stream failed"
            );
            self.report(err);
        }
    }

    async fn run_inner<M>(&mut self, on_message: &mut M) -> BridgeResult<()>
    where
        M: FnMut(ChatMessage) + Send,
    {
        let result = self.drive(on_message).await;
        self.handle.set_state(ConnectionState::Closed);

        match result {
            Err(err) if self.handle.is_closed() => {
                tracing::debug!(error = %err, "suppressing error after close");
                Ok(())
            }
            other => other,
        }
    }

    async fn drive<M>(&mut self, on_message: &mut M) -> BridgeResult<()>
    where
        M: FnMut(ChatMessage) + Send,
    {
        let opened = tokio::select! {
            biased;
            _ = self.handle.closed() => return Ok(()),
            opened = open_stream(self.http.as_ref(), &self.url, self.last_event_id) => opened,
        };
        let body = opened?;

        if !self.handle.mark_open() {
            return Ok(());
        }
        tracing::info!(url = %self.url, "sse stream open");

        let mut messages = message_stream(body);
        loop {
            let next = tokio::select! {
                biased;
                _ = self.handle.closed() => return Ok(()),
                next = messages.next() => next,
            };

            match next {
                Some(Ok(message)) => self.deliver(message, on_message),
                Some(Err(err)) if err.is_frame_error() => {
                    tracing::warn!(url = %self.url, error = %err, "skipping sse frame");
                    self.report(err.into());
                }
                Some(Err(err)) => return Err(err.into()),
                None => {
                    tracing::info!(url = %self.url, "sse stream ended by server");
                    return Ok(());
                }
            }
        }
    }

    fn deliver<M>(&mut self, message: ChatMessage, on_message: &mut M)
    where
        M: FnMut(ChatMessage) + Send,
    {
        let id = message.id();
        match panic::catch_unwind(AssertUnwindSafe(|| on_message(message))) {
            Ok(()) => {
                if let Some(id) = id {
                    self.handle.record_delivered(id);
                }
            }
            Err(payload) => {
                let err = StreamError::Delivery {
                    message: panic_message(payload.as_ref()),
                };
                tracing::warn!(url = %self.url, error = %err, "message handler panicked");
                self.report(err.into());
            }
        }
    }

    fn report(&mut self, err: BridgeError) {
        if self.handle.is_closed() {
            tracing::debug!(error = %err, "suppressing error after close");
            return;
        }
        if let Some(handler) = self.on_error.as_mut() {
            handler(err);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
