//! Lazy message stream over an SSE body.

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use std::pin::Pin;

use crate::error::StreamError;
use crate::models::ChatMessage;
use crate::sse::{LineDecoder, SseParser, MAX_LINE_LEN};
use crate::traits::ByteStream;

/// Messages decoded from one SSE body.
///
/// Frame errors are yielded as items and the stream goes on; a body read
/// failure is yielded once as [`StreamError::ConnectionLost`] and ends it.
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<ChatMessage, StreamError>> + Send>>;

struct State {
    body: ByteStream,
    parser: SseParser,
    lines: LineDecoder,
    finished: bool,
}

/// Decode an SSE body lazily: nothing is read until the stream is polled.
pub fn message_stream(body: ByteStream) -> MessageStream {
    message_stream_with_limit(body, MAX_LINE_LEN)
}

/// Like [`message_stream`], rejecting lines longer than `max_line_len`.
///
/// An overlong line is reported as [`StreamError::Decode`] and the frame it
/// belongs to is dropped; the stream goes on with the next frame.
pub fn message_stream_with_limit(body: ByteStream, max_line_len: usize) -> MessageStream {
    let state = State {
        body,
        parser: SseParser::new(),
        lines: LineDecoder::with_max_line_len(max_line_len),
        finished: false,
    };

    let messages = stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }
        loop {
            // First, drain complete lines already buffered
            while let Some(line) = state.lines.next_line() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        // The frame around the dropped line is unusable
                        state.parser.reset();
                        let err = StreamError::Decode {
                            raw: String::new(),
                            message: e.to_string(),
                        };
                        return Some((Err(err), state));
                    }
                };
                match state.parser.feed_line(&line) {
                    Ok(Some(message)) => return Some((Ok(message), state)),
                    Ok(None) => {}
                    Err(e) => return Some((Err(StreamError::from(e)), state)),
                }
            }

            match state.body.next().await {
                Some(Ok(chunk)) => state.lines.extend(&chunk),
                Some(Err(e)) => {
                    state.finished = true;
                    let err = StreamError::ConnectionLost {
                        message: e.to_string(),
                    };
                    return Some((Err(err), state));
                }
                None => {
                    if state.lines.pending() > 0 {
                        tracing::debug!(
                            bytes = state.lines.pending(),
                            "discarding unterminated SSE frame at end of stream"
                        );
                    }
                    return None;
                }
            }
        }
    });

    Box::pin(messages)
}
