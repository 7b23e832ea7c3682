//! Error handling for the bridge client.
//!
//! | Error | Raised when | Where it surfaces |
//! |-------|-------------|-------------------|
//! | [`BridgeError::Transport`] | no answer (connect failure, timeout) | returned to the caller |
//! | [`BridgeError::StreamOpen`] | stream endpoint answered non-200 | returned, or `on_error` in background mode |
//! | [`BridgeError::Decode`] | a 401 subscribe body is malformed | returned to the caller |
//! | [`StreamError::Decode`] | one SSE frame is malformed | `on_error`; the stream continues |
//! | [`StreamError::Delivery`] | the message handler panicked | `on_error`; the stream continues |
//! | [`StreamError::ConnectionLost`] | the body read failed | returned, or `on_error` in background mode |
//!
//! Read failures caused by closing a [`SseHandle`](crate::SseHandle) are
//! never reported.

mod bridge_error;
mod stream;

pub use bridge_error::{BridgeError, BridgeResult};
pub use stream::StreamError;
