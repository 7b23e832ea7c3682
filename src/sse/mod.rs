//! SSE (Server-Sent Events) stream parsing
//!
//! The bridge sends one chat message per frame:
//! - `id: <n>` - sequence id, usable as `Last-Event-ID` to resume
//! - `event: <name>` - only `heartbeat` is meaningful (keep-alive, dropped)
//! - `data: <json>` - message payload, possibly split over several lines
//! - Empty line - ends the frame
//!
//! Anything else (comments starting with `:`, `retry:`) is ignored.

mod events;
mod lines;
mod parser;
mod stream;

pub use events::{parse_sse_line, SseLine, SseParseError};
pub use lines::{LineDecoder, LineTooLong, MAX_LINE_LEN};
pub use parser::{SseParser, HEARTBEAT_EVENT};
pub use stream::{message_stream, message_stream_with_limit, MessageStream};
