//! Stateful SSE parser turning lines into chat messages.

use crate::models::ChatMessage;
use crate::sse::events::{parse_sse_line, SseLine, SseParseError};

/// Event name of keep-alive frames.
pub const HEARTBEAT_EVENT: &str = "heartbeat";

/// Placeholder payload sent with no content.
const EMPTY_PAYLOAD: &str = "{}";

/// Longest payload excerpt kept in decode errors.
const RAW_EXCERPT_LEN: usize = 200;

/// Fields of the frame being accumulated.
#[derive(Debug, Default)]
struct SseFrame {
    event: Option<String>,
    id: Option<String>,
    /// Data lines joined by '\n'
    data: String,
    data_lines: usize,
}

impl SseFrame {
    fn push_data(&mut self, line: &str) {
        if self.data_lines > 0 {
            self.data.push('\n');
        }
        self.data.push_str(line);
        self.data_lines += 1;
    }

    /// Clear in place, keeping the data buffer's allocation.
    fn reset(&mut self) {
        self.event = None;
        self.id = None;
        self.data.clear();
        self.data_lines = 0;
    }

    /// Payload to decode, or `None` if the frame carries no message.
    fn payload(&self) -> Option<&str> {
        if self.data_lines == 0 || self.event.as_deref() == Some(HEARTBEAT_EVENT) {
            return None;
        }
        let payload = self.data.trim();
        if payload.is_empty() || payload == EMPTY_PAYLOAD {
            return None;
        }
        Some(payload)
    }

    fn decode(&self) -> Result<Option<ChatMessage>, SseParseError> {
        let Some(payload) = self.payload() else {
            return Ok(None);
        };

        let mut message: ChatMessage =
            serde_json::from_str(payload).map_err(|e| SseParseError::InvalidJson {
                raw: payload.chars().take(RAW_EXCERPT_LEN).collect(),
                message: e.to_string(),
            })?;

        if let Some(id) = self.id.as_deref() {
            message.id = id.parse().map_err(|_| SseParseError::InvalidId {
                id: id.to_string(),
            })?;
        }

        Ok(Some(message))
    }
}

/// Stateful SSE parser that accumulates lines and emits chat messages.
///
/// Frames named `heartbeat` and frames whose data is empty or `{}` produce
/// nothing. A frame that fails to decode produces an error and leaves the
/// parser ready for the next frame.
///
/// ```
/// use chzzk_bridge_client::sse::SseParser;
///
/// let mut parser = SseParser::new();
/// assert!(parser.feed_line("id: 5").unwrap().is_none());
/// assert!(parser.feed_line(r#"data: {"message":"hi"}"#).unwrap().is_none());
/// let message = parser.feed_line("").unwrap().unwrap();
/// assert_eq!(message.id(), Some(5));
/// ```
#[derive(Debug, Default)]
pub struct SseParser {
    frame: SseFrame,
}

impl SseParser {
    /// Create a new SSE parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a line to the parser, potentially returning a complete message
    ///
    /// Returns:
    /// - `Ok(Some(message))` - A frame ended and carried a message
    /// - `Ok(None)` - Line was consumed, or the frame carried nothing
    /// - `Err(error)` - The frame that just ended could not be decoded
    pub fn feed_line(&mut self, line: &str) -> Result<Option<ChatMessage>, SseParseError> {
        match parse_sse_line(line) {
            SseLine::Empty => {
                let result = self.frame.decode();
                self.frame.reset();
                result
            }
            SseLine::Data(data) => {
                self.frame.push_data(&data);
                Ok(None)
            }
            SseLine::Event(event) => {
                self.frame.event = Some(event);
                Ok(None)
            }
            SseLine::Id(id) => {
                self.frame.id = Some(id);
                Ok(None)
            }
            SseLine::Ignored(_) => Ok(None),
        }
    }

    /// Discard the partially accumulated frame.
    pub fn reset(&mut self) {
        self.frame.reset();
    }
}
