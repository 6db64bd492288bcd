use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use tracing::{debug, trace};

use crate::consumer::{dispatch, StreamConsumer};
use crate::decoder::NdjsonDecoder;
use crate::error::ChatApiError;

/// Cooperative cancellation flag shared with the task driving a stream.
pub type CancellationSignal = Arc<AtomicBool>;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How a stream ended, as seen by the caller.
///
/// The consumer only ever sees the single error channel; this value lets the
/// caller tell a transport failure apart from a completed stream that carried
/// `"error"` records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Source exhausted; `on_complete` was called.
    Completed,
    /// Transport failure; `on_error` was called with this message.
    Failed(String),
    /// Cancelled; no terminal callback was made.
    Cancelled,
}

impl StreamOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Drive a byte stream to completion, dispatching every decoded record.
///
/// Records are dispatched in line order. Exactly one terminal callback fires
/// unless the stream is cancelled, after which no callback fires at all. An
/// unterminated trailing line is dropped at end of stream.
pub async fn drive_stream<S, B, E, C>(
    source: S,
    consumer: &mut C,
    cancellation: Option<&CancellationSignal>,
) -> StreamOutcome
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
    C: StreamConsumer + ?Sized,
{
    let mut source = std::pin::pin!(source);
    let mut decoder = NdjsonDecoder::default();

    loop {
        let Ok(next) = await_or_cancel(source.next(), cancellation).await else {
            return StreamOutcome::Cancelled;
        };
        let Some(chunk) = next else {
            break;
        };

        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(error) => {
                let message = error.to_string();
                debug!(%message, "stream transport failure");
                consumer.on_error(&message);
                return StreamOutcome::Failed(message);
            }
        };
        trace!(bytes = bytes.as_ref().len(), "stream chunk received");

        for event in decoder.feed(bytes.as_ref()) {
            if is_cancelled(cancellation) {
                return StreamOutcome::Cancelled;
            }
            dispatch(consumer, event);
        }
    }

    decoder.finish();
    if is_cancelled(cancellation) {
        return StreamOutcome::Cancelled;
    }
    consumer.on_complete();
    StreamOutcome::Completed
}

pub(crate) fn is_cancelled(cancel: Option<&CancellationSignal>) -> bool {
    cancel.is_some_and(|token| token.load(Ordering::Acquire))
}

/// Await `future`, giving up as soon as the cancellation flag is raised.
pub(crate) async fn await_or_cancel<F>(
    future: F,
    cancellation: Option<&CancellationSignal>,
) -> Result<F::Output, ChatApiError>
where
    F: Future,
{
    if cancellation.is_none() {
        return Ok(future.await);
    }

    let mut future = std::pin::pin!(future);

    loop {
        if is_cancelled(cancellation) {
            return Err(ChatApiError::Cancelled);
        }

        if let Ok(output) = tokio::time::timeout(CANCEL_POLL_INTERVAL, &mut future).await {
            if is_cancelled(cancellation) {
                return Err(ChatApiError::Cancelled);
            }
            return Ok(output);
        }
    }
}
