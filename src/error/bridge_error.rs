use super::StreamError;
use crate::traits::HttpError;

/// Unified error type for bridge client operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The request could not be sent or timed out.
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    /// The stream endpoint answered with something other than 200.
    #[error("failed to open event stream: HTTP {status}")]
    StreamOpen { status: u16, body: String },

    /// A response body the protocol requires could not be decoded.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// An open stream failed.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl BridgeError {
    /// Check if repeating the operation could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            BridgeError::Transport(err) => err.is_retryable(),
            BridgeError::StreamOpen { status, .. } => *status >= 500,
            BridgeError::Decode(_) => false,
            BridgeError::Stream(err) => err.should_reconnect(),
        }
    }

    /// Check if this error concerns a single frame of an otherwise healthy stream.
    pub fn is_frame_error(&self) -> bool {
        matches!(self, BridgeError::Stream(err) if err.is_frame_error())
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            BridgeError::StreamOpen { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized Result type for bridge client operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
