//! Splitting a chunked body into lines.

use bytes::BytesMut;

/// Longest line accepted by default, terminator excluded.
pub const MAX_LINE_LEN: usize = 1024 * 1024;

/// A line longer than the decoder accepts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line exceeds {limit} bytes")]
pub struct LineTooLong {
    pub limit: usize,
}

/// Buffers body chunks and yields complete lines.
///
/// Lines end with `\n`; a preceding `\r` is dropped. Chunks may split lines
/// and multi-byte UTF-8 sequences anywhere: bytes stay buffered until their
/// line terminator arrives. Invalid UTF-8 is replaced, not rejected.
///
/// A line longer than the limit is reported once as [`LineTooLong`] and its
/// bytes are dropped up to the next terminator, so the buffer never holds
/// much more than one chunk past the limit.
#[derive(Debug)]
pub struct LineDecoder {
    buf: BytesMut,
    /// Bytes already searched for a terminator
    scanned: usize,
    max_line_len: usize,
    /// Dropping the rest of an overlong line
    discarding: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::with_max_line_len(MAX_LINE_LEN)
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line_len(max_line_len: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            scanned: 0,
            max_line_len,
            discarding: false,
        }
    }

    /// Append a received chunk.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Next complete line, if one is buffered.
    pub fn next_line(&mut self) -> Option<Result<String, LineTooLong>> {
        loop {
            let offset = self.buf[self.scanned..].iter().position(|&b| b == b'\n');
            let Some(offset) = offset else {
                // Room for a '\r' whose '\n' has not arrived yet
                if self.buf.len() <= self.max_line_len + 1 {
                    self.scanned = self.buf.len();
                    return None;
                }
                self.buf.clear();
                self.scanned = 0;
                if self.discarding {
                    return None;
                }
                self.discarding = true;
                return Some(Err(self.too_long()));
            };

            let line = self.buf.split_to(self.scanned + offset + 1);
            self.scanned = 0;
            if self.discarding {
                // Tail of a line already reported
                self.discarding = false;
                continue;
            }

            let mut end = line.len() - 1;
            if end > 0 && line[end - 1] == b'\r' {
                end -= 1;
            }
            if end > self.max_line_len {
                return Some(Err(self.too_long()));
            }
            return Some(Ok(String::from_utf8_lossy(&line[..end]).into_owned()));
        }
    }

    /// Bytes of an unterminated trailing line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    fn too_long(&self) -> LineTooLong {
        LineTooLong {
            limit: self.max_line_len,
        }
    }
}
