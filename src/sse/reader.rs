//! Frame reader: raw byte chunks to complete text lines.
//!
//! The job endpoint streams its body in arbitrarily sized chunks. A single
//! frame may arrive split over many chunks (even inside a multi-byte UTF-8
//! character), and a single chunk may carry many frames. [`LineBuffer`]
//! reconstructs lines exactly; [`FrameReader`] pulls chunks from a byte
//! stream on demand and hands out one line at a time.

use bytes::Bytes;
use futures::Stream;
use futures_util::StreamExt;

use crate::traits::HttpError;

/// Incremental UTF-8 decoder and line splitter.
///
/// Holds the decoded-but-unterminated tail of the stream plus any trailing
/// bytes of an incomplete UTF-8 sequence. Concatenating every line taken out
/// of the buffer (with their `\n`) and the current tail always reproduces the
/// decoded input exactly.
#[derive(Debug, Default)]
pub struct LineBuffer {
    /// Decoded text not yet terminated by `\n`
    text: String,
    /// Bytes of a code point split across chunks, waiting for the rest
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk and append it to the buffered text.
    ///
    /// An incomplete trailing UTF-8 sequence is held back until the next
    /// chunk. Invalid byte sequences decode to U+FFFD.
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    self.text.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    self.text.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(invalid_len) => {
                            self.text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[invalid_len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Take the next complete line, without its `\n` (and a trailing `\r`,
    /// if the backend sends CRLF).
    pub fn next_line(&mut self) -> Option<String> {
        let newline_pos = self.text.find('\n')?;
        let mut line: String = self.text.drain(..=newline_pos).collect();
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }

    /// Flush the buffer at end of stream.
    ///
    /// Returns the unterminated remainder as a final line, if there is one.
    /// Dangling bytes of a truncated code point decode to U+FFFD rather than
    /// being dropped.
    pub fn finish(&mut self) -> Option<String> {
        if !self.pending.is_empty() {
            let pending = std::mem::take(&mut self.pending);
            self.text.push_str(&String::from_utf8_lossy(&pending));
        }
        if self.text.is_empty() {
            return None;
        }
        let mut line = std::mem::take(&mut self.text);
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }

    /// Decoded text currently waiting for a newline.
    pub fn pending_text(&self) -> &str {
        &self.text
    }

    /// True if nothing is buffered, decoded or not.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.pending.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Open,
    Ended,
    Failed,
}

/// Pulls lines out of a byte stream, reading a new chunk only when the
/// buffer holds no complete line.
///
/// After end-of-stream or a transport error the reader is exhausted and
/// never polls the underlying stream again.
pub struct FrameReader<S> {
    stream: S,
    buffer: LineBuffer,
    state: ReaderState,
}

impl<S> FrameReader<S>
where
    S: Stream<Item = Result<Bytes, HttpError>> + Unpin,
{
    /// Wrap a byte stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: LineBuffer::new(),
            state: ReaderState::Open,
        }
    }

    /// Read the next line.
    ///
    /// Returns:
    /// - `Ok(Some(line))` - a complete line
    /// - `Ok(None)` - end of stream (any unterminated remainder was already
    ///   returned as the last line)
    /// - `Err(error)` - the transport failed; the reader is now exhausted
    pub async fn next_line(&mut self) -> Result<Option<String>, HttpError> {
        loop {
            if let Some(line) = self.buffer.next_line() {
                return Ok(Some(line));
            }

            if self.state != ReaderState::Open {
                return Ok(None);
            }

            match self.stream.next().await {
                Some(Ok(chunk)) => self.buffer.push_chunk(&chunk),
                Some(Err(e)) => {
                    self.state = ReaderState::Failed;
                    return Err(e);
                }
                None => {
                    self.state = ReaderState::Ended;
                    return Ok(self.buffer.finish());
                }
            }
        }
    }

    /// True once end-of-stream or a transport error has been seen.
    pub fn is_exhausted(&self) -> bool {
        self.state != ReaderState::Open
    }

    /// Turn the reader into a stream of lines that ends after the first error.
    pub fn into_lines(self) -> impl Stream<Item = Result<String, HttpError>> {
        futures_util::stream::unfold(Some(self), |reader| async move {
            let mut reader = reader?;
            match reader.next_line().await {
                Ok(Some(line)) => Some((Ok(line), Some(reader))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}
