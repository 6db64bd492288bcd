use tracing::{debug, trace};

use crate::events::{Envelope, StreamEvent};

/// Incremental parser for newline-delimited JSON envelopes.
///
/// The only carried state is the partial-line buffer. It holds raw bytes: a
/// newline byte never occurs inside a multi-byte UTF-8 sequence, so a
/// character split across two chunks is whole again by the time its line is
/// complete and decoded.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed arbitrary bytes into the decoder and drain events for every line
    /// completed by them, in line order.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if bytes.is_empty() {
            return events;
        }

        let scan_from = self.buffer.len();
        self.buffer.extend_from_slice(bytes);

        let Some(last_newline) = self.buffer[scan_from..]
            .iter()
            .rposition(|byte| *byte == b'\n')
            .map(|offset| scan_from + offset)
        else {
            return events;
        };

        // Everything after the last newline is the new partial line.
        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);

        for line in complete.split(|byte| *byte == b'\n') {
            if let Some(event) = decode_line(line) {
                events.push(event);
            }
        }

        events
    }

    /// Decode a complete payload in one shot. A trailing unterminated line is
    /// dropped, exactly as it is at end of stream.
    pub fn parse_lines(input: &str) -> Vec<StreamEvent> {
        let mut decoder = Self::default();
        decoder.feed(input.as_bytes())
    }

    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// End the stream, discarding any unterminated trailing line.
    ///
    /// Returns how many bytes were dropped.
    pub fn finish(self) -> usize {
        if !self.buffer.is_empty() {
            debug!(
                bytes = self.buffer.len(),
                "discarding unterminated trailing line at end of stream"
            );
        }
        self.buffer.len()
    }
}

fn decode_line(line: &[u8]) -> Option<StreamEvent> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let envelope = match serde_json::from_str::<Envelope>(text) {
        Ok(envelope) => envelope,
        Err(error) => {
            debug!(%error, line = text, "skipping malformed stream line");
            return None;
        }
    };

    let kind = envelope.kind.clone();
    let event = envelope.into_event();
    if event.is_none() {
        trace!(kind = %kind, "ignoring unknown envelope type");
    }
    event
}
