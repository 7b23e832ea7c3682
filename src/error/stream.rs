//! Streaming-related error types.
//!
//! Errors raised while an SSE stream is being consumed. Frame-level errors
//! are isolated to the frame that caused them; the stream keeps going.

use crate::sse::SseParseError;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    /// One frame could not be turned into a message.
    #[error("undecodable frame: {message}")]
    Decode {
        /// The offending payload, truncated
        raw: String,
        message: String,
    },

    /// The message handler panicked while processing one message.
    #[error("message handler failed: {message}")]
    Delivery { message: String },

    /// Reading the body failed; the stream is over.
    #[error("stream connection lost: {message}")]
    ConnectionLost { message: String },
}

impl StreamError {
    /// Check if the error affects a single frame only.
    pub fn is_frame_error(&self) -> bool {
        matches!(self, StreamError::Decode { .. } | StreamError::Delivery { .. })
    }

    /// Check if the stream should be reopened to continue.
    pub fn should_reconnect(&self) -> bool {
        matches!(self, StreamError::ConnectionLost { .. })
    }
}

impl From<SseParseError> for StreamError {
    fn from(err: SseParseError) -> Self {
        match err {
            SseParseError::InvalidJson { raw, message } => StreamError::Decode { raw, message },
            SseParseError::InvalidId { id } => StreamError::Decode {
                message: format!("event id '{}' is not an integer", id),
                raw: id,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let decode = StreamError::Decode {
            raw: "{".to_string(),
            message: "EOF".to_string(),
        };
        let delivery = StreamError::Delivery {
            message: "boom".to_string(),
        };
        let lost = StreamError::ConnectionLost {
            message: "reset".to_string(),
        };

        assert!(decode.is_frame_error());
        assert!(delivery.is_frame_error());
        assert!(!lost.is_frame_error());

        assert!(!decode.should_reconnect());
        assert!(lost.should_reconnect());
    }

    #[test]
    fn test_from_parse_error() {
        let err: StreamError = SseParseError::InvalidId {
            id: "abc".to_string(),
        }
        .into();
        assert_eq!(
            err,
            StreamError::Decode {
                raw: "abc".to_string(),
                message: "event id 'abc' is not an integer".to_string(),
            }
        );
    }

    #[test]
    fn test_display() {
        let err = StreamError::ConnectionLost {
            message: "reset".to_string(),
        };
        assert_eq!(err.to_string(), "stream connection lost: reset");
    }
}
