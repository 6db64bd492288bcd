//! Plain-text consumer that writes a streamed reply as it arrives.

use std::io::{self, Write};
use std::sync::atomic::Ordering;

use chat_api::{CancellationSignal, StreamConsumer};
use tracing::warn;

/// Writes assistant text to `out` and thread notices to `notes`.
///
/// Error messages are written inline into the reply, prefixed with
/// `Error: `, the same way the reply itself is shown. The first failed write
/// to `out` is kept, later output is dropped, and the cancellation signal (if
/// any) is raised so the stream stops.
pub struct ReplyPrinter<O, N> {
    out: O,
    notes: N,
    thread_id: Option<String>,
    wrote_text: bool,
    write_error: Option<io::Error>,
    cancellation: Option<CancellationSignal>,
}

impl<O, N> ReplyPrinter<O, N>
where
    O: Write,
    N: Write,
{
    pub fn new(out: O, notes: N) -> Self {
        Self {
            out,
            notes,
            thread_id: None,
            wrote_text: false,
            write_error: None,
            cancellation: None,
        }
    }

    /// Raise `cancellation` when the reply can no longer be written.
    pub fn with_cancellation(mut self, cancellation: CancellationSignal) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    /// Thread id announced by the backend, if any.
    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    /// First error hit while writing the reply.
    pub fn write_error(&self) -> Option<&io::Error> {
        self.write_error.as_ref()
    }

    pub fn into_parts(self) -> (O, N) {
        (self.out, self.notes)
    }

    fn write_out(&mut self, bytes: &[u8]) {
        if self.write_error.is_some() {
            return;
        }
        let result = self
            .out
            .write_all(bytes)
            .and_then(|()| self.out.flush());
        if let Err(error) = result {
            warn!(%error, "reply output closed; stopping stream");
            if let Some(cancellation) = &self.cancellation {
                cancellation.store(true, Ordering::Release);
            }
            self.write_error = Some(error);
        }
    }

    fn end_line(&mut self) {
        if self.wrote_text {
            self.write_out(b"\n");
            self.wrote_text = false;
        }
    }
}

impl<O, N> StreamConsumer for ReplyPrinter<O, N>
where
    O: Write,
    N: Write,
{
    fn on_chunk(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.write_out(text.as_bytes());
        self.wrote_text = !text.ends_with('\n');
    }

    fn on_thread_id(&mut self, id: &str) {
        let _ = writeln!(self.notes, "thread: {id}");
        self.thread_id = Some(id.to_owned());
    }

    fn on_error(&mut self, message: &str) {
        self.end_line();
        self.write_out(format!("Error: {message}\n").as_bytes());
    }

    fn on_complete(&mut self) {
        self.end_line();
    }
}
