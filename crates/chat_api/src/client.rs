use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ChatApiConfig;
use crate::consumer::{EventLog, StreamConsumer};
use crate::error::{
    ChatApiError, HISTORY_FAILED_MESSAGE, SEND_FAILED_MESSAGE, THREADS_FAILED_MESSAGE,
};
use crate::events::StreamEvent;
use crate::payload::{ChatRequest, HistoryMessage, HistoryResponse, ThreadList, ThreadSummary};
use crate::stream::{
    await_or_cancel, drive_stream, is_cancelled, CancellationSignal, StreamOutcome,
};
use crate::url::endpoint;

const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

#[derive(Debug, Clone)]
pub struct ChatApiClient {
    http: Client,
    config: ChatApiConfig,
}

#[derive(Debug, Clone)]
pub struct StreamResult {
    pub events: Vec<StreamEvent>,
    pub outcome: StreamOutcome,
}

impl StreamResult {
    /// Concatenated assistant text of the stream.
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(StreamEvent::as_chunk)
            .collect()
    }
}

impl ChatApiClient {
    pub fn new(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ChatApiConfig {
        &self.config
    }

    pub fn build_headers(&self) -> Result<HeaderMap, ChatApiError> {
        let mut headers = HeaderMap::new();
        if let Some(user_agent) = self
            .config
            .user_agent
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            headers.insert(USER_AGENT, header_value("user-agent", user_agent)?);
        }

        for (key, value) in &self.config.extra_headers {
            let key = key.trim().to_ascii_lowercase();
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                ChatApiError::InvalidConfig(format!("invalid header key: {key}"))
            })?;
            headers.insert(name, header_value(&key, value.trim())?);
        }
        Ok(headers)
    }

    pub fn build_chat_request(
        &self,
        request: &ChatRequest,
    ) -> Result<reqwest::RequestBuilder, ChatApiError> {
        let url = endpoint(&self.config.base_url, &["chat"])?;
        Ok(self
            .http
            .post(url)
            .headers(self.build_headers()?)
            .header(ACCEPT, NDJSON_CONTENT_TYPE)
            .json(request))
    }

    /// Send a chat message and stream the reply into `consumer`.
    ///
    /// A non-success status is reported once as
    /// `on_error("Failed to send message")` and the body is not read. A request
    /// that cannot be sent at all reports the transport error text instead.
    /// Otherwise the body is decoded line by line until it ends.
    pub async fn stream_chat<C>(
        &self,
        request: &ChatRequest,
        consumer: &mut C,
        cancellation: Option<&CancellationSignal>,
    ) -> StreamOutcome
    where
        C: StreamConsumer + ?Sized,
    {
        let response = match self.send_chat(request, cancellation).await {
            Ok(response) => response,
            Err(ChatApiError::Cancelled) => return StreamOutcome::Cancelled,
            Err(error) => {
                debug!(%error, "chat request failed");
                if is_cancelled(cancellation) {
                    return StreamOutcome::Cancelled;
                }
                let message = match error {
                    ChatApiError::Status { message, .. } => message,
                    other => other.to_string(),
                };
                consumer.on_error(&message);
                return StreamOutcome::Failed(message);
            }
        };

        drive_stream(response.bytes_stream(), consumer, cancellation).await
    }

    /// Stream a reply and collect every event along with the outcome.
    pub async fn stream_chat_collect(
        &self,
        request: &ChatRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> StreamResult {
        let mut log = EventLog::new();
        let outcome = self.stream_chat(request, &mut log, cancellation).await;
        StreamResult {
            events: log.events,
            outcome,
        }
    }

    async fn send_chat(
        &self,
        request: &ChatRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<Response, ChatApiError> {
        if is_cancelled(cancellation) {
            return Err(ChatApiError::Cancelled);
        }

        let response = await_or_cancel(self.build_chat_request(request)?.send(), cancellation)
            .await??;
        let status = response.status();
        if !status.is_success() {
            return Err(ChatApiError::status(status, SEND_FAILED_MESSAGE));
        }
        Ok(response)
    }

    /// List the threads known to the backend, in backend order.
    pub async fn list_threads(&self) -> Result<Vec<ThreadSummary>, ChatApiError> {
        let list: ThreadList = self.get_json(&["threads"], THREADS_FAILED_MESSAGE).await?;
        Ok(list.threads)
    }

    /// Fetch the ordered message history of one thread.
    pub async fn get_history(
        &self,
        thread_id: &str,
    ) -> Result<Vec<HistoryMessage>, ChatApiError> {
        let history: HistoryResponse = self
            .get_json(&["history", thread_id], HISTORY_FAILED_MESSAGE)
            .await?;
        Ok(history.messages)
    }

    async fn get_json<T>(&self, segments: &[&str], failure: &str) -> Result<T, ChatApiError>
    where
        T: DeserializeOwned,
    {
        let url = endpoint(&self.config.base_url, segments)?;
        let response = self
            .http
            .get(url)
            .headers(self.build_headers()?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatApiError::status(status, failure));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn header_value(key: &str, value: &str) -> Result<HeaderValue, ChatApiError> {
    HeaderValue::from_str(value)
        .map_err(|_| ChatApiError::InvalidConfig(format!("invalid header value for {key}")))
}

#[cfg(test)]
mod tests {
    use super::ChatApiClient;
    use crate::config::ChatApiConfig;
    use crate::payload::ChatRequest;

    #[test]
    fn chat_request_posts_json_to_chat_endpoint() {
        let client = ChatApiClient::new(ChatApiConfig::new("http://localhost:8000/"))
            .expect("client");
        let request = client
            .build_chat_request(&ChatRequest::new("hello"))
            .expect("builder")
            .build()
            .expect("request");

        assert_eq!(request.method(), "POST");
        assert_eq!(request.url().as_str(), "http://localhost:8000/chat");
        assert_eq!(request.headers()["accept"], "application/x-ndjson");
        assert_eq!(request.headers()["content-type"], "application/json");

        let body = request
            .body()
            .and_then(|body| body.as_bytes())
            .expect("json body");
        let body: serde_json::Value = serde_json::from_slice(body).expect("body json");
        assert_eq!(body, serde_json::json!({"message": "hello", "thread_id": null}));
    }

    #[test]
    fn extra_headers_are_lowercased_and_trimmed() {
        let config = ChatApiConfig::default()
            .with_user_agent("chat-client/0.1")
            .insert_header(" X-Trace ", " abc ");
        let client = ChatApiClient::new(config).expect("client");
        let headers = client.build_headers().expect("headers");

        assert_eq!(headers["x-trace"], "abc");
        assert_eq!(headers["user-agent"], "chat-client/0.1");
    }
}
