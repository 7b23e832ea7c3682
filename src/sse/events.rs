//! SSE line types and parse errors.

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event name declaration (e.g., "event: heartbeat")
    Event(String),
    /// Data payload (e.g., "data: {\"message\": \"hello\"}")
    Data(String),
    /// Event id (e.g., "id: 42")
    Id(String),
    /// Empty line - signals end of event
    Empty,
    /// Comment (starts with ':') or a field this client does not use
    Ignored(String),
}

/// Parse a single SSE line (without its line terminator).
///
/// Field values are trimmed on both sides.
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("id:") {
        return SseLine::Id(rest.trim().to_string());
    }

    SseLine::Ignored(line.to_string())
}

/// Errors that can occur while turning one frame into a message
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SseParseError {
    /// Payload is not a valid chat message
    #[error("invalid JSON payload: {message}")]
    InvalidJson { raw: String, message: String },
    /// The frame's id line is not an integer
    #[error("invalid event id: {id}")]
    InvalidId { id: String },
}
