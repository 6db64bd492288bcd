use crate::events::StreamEvent;

/// Receiver for one stream's records.
///
/// Every record reaches the consumer in the order its line ended in the
/// response body. A stream ends with exactly one terminal call: either
/// [`on_complete`](Self::on_complete), or [`on_error`](Self::on_error) for a
/// transport failure. `on_error` is also used for far-end `"error"` records,
/// which do not end the stream.
pub trait StreamConsumer {
    fn on_chunk(&mut self, text: &str);

    /// Called for `"thread_id"` records. Ignored unless overridden.
    fn on_thread_id(&mut self, _id: &str) {}

    fn on_error(&mut self, message: &str);

    fn on_complete(&mut self);
}

/// Route one event to the matching consumer callback.
pub fn dispatch<C>(consumer: &mut C, event: StreamEvent)
where
    C: StreamConsumer + ?Sized,
{
    match event {
        StreamEvent::Chunk(text) => consumer.on_chunk(&text),
        StreamEvent::ThreadId(id) => consumer.on_thread_id(&id),
        StreamEvent::Error(message) => consumer.on_error(&message),
        StreamEvent::Complete => consumer.on_complete(),
    }
}

/// A single tagged-union callback is a consumer too.
impl<F> StreamConsumer for F
where
    F: FnMut(StreamEvent),
{
    fn on_chunk(&mut self, text: &str) {
        self(StreamEvent::Chunk(text.to_owned()));
    }

    fn on_thread_id(&mut self, id: &str) {
        self(StreamEvent::ThreadId(id.to_owned()));
    }

    fn on_error(&mut self, message: &str) {
        self(StreamEvent::Error(message.to_owned()));
    }

    fn on_complete(&mut self) {
        self(StreamEvent::Complete);
    }
}

/// Consumer that records every callback in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    pub events: Vec<StreamEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenated text of every `Chunk` event.
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(StreamEvent::as_chunk)
            .collect()
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            StreamEvent::ThreadId(id) => Some(id.as_str()),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                StreamEvent::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn completed(&self) -> bool {
        self.events.last() == Some(&StreamEvent::Complete)
    }
}

impl StreamConsumer for EventLog {
    fn on_chunk(&mut self, text: &str) {
        self.events.push(StreamEvent::Chunk(text.to_owned()));
    }

    fn on_thread_id(&mut self, id: &str) {
        self.events.push(StreamEvent::ThreadId(id.to_owned()));
    }

    fn on_error(&mut self, message: &str) {
        self.events.push(StreamEvent::Error(message.to_owned()));
    }

    fn on_complete(&mut self) {
        self.events.push(StreamEvent::Complete);
    }
}
