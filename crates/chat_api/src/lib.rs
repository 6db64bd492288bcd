//! Transport-only client primitives for the chat backend.
//!
//! This crate owns request building, NDJSON stream decoding and callback
//! dispatch for the `/chat`, `/threads` and `/history` endpoints. It contains
//! no rendering and no persistence; thread state lives on the backend.
//!
//! The streaming entry point is [`ChatApiClient::stream_chat`], which drives a
//! response body through [`NdjsonDecoder`] and reports every record to a
//! [`StreamConsumer`]. The decoder loop itself is exposed as
//! [`drive_stream`] so any byte stream can be decoded the same way.

pub mod client;
pub mod config;
pub mod consumer;
pub mod decoder;
pub mod error;
pub mod events;
pub mod payload;
pub mod stream;
pub mod url;

pub use client::{ChatApiClient, StreamResult};
pub use config::ChatApiConfig;
pub use consumer::{EventLog, StreamConsumer};
pub use decoder::NdjsonDecoder;
pub use error::ChatApiError;
pub use events::{Envelope, StreamEvent};
pub use payload::{ChatRequest, HistoryMessage, Role, ThreadSummary};
pub use stream::{drive_stream, CancellationSignal, StreamOutcome};
pub use url::{endpoint, DEFAULT_BASE_URL};
