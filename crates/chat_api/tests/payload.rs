use chat_api::payload::{HistoryResponse, ThreadList};
use chat_api::{endpoint, ChatRequest, Envelope, Role, StreamEvent, DEFAULT_BASE_URL};
use serde_json::json;

#[test]
fn chat_request_always_carries_thread_id_field() {
    let fresh = serde_json::to_value(ChatRequest::new("hi")).expect("serialize");
    assert_eq!(fresh, json!({"message": "hi", "thread_id": null}));

    let follow_up =
        serde_json::to_value(ChatRequest::new("more").with_thread_id("t-1")).expect("serialize");
    assert_eq!(follow_up, json!({"message": "more", "thread_id": "t-1"}));
}

#[test]
fn envelope_maps_known_discriminators() {
    let cases = [
        ("chunk", Some(StreamEvent::Chunk("c".to_owned()))),
        ("thread_id", Some(StreamEvent::ThreadId("c".to_owned()))),
        ("error", Some(StreamEvent::Error("c".to_owned()))),
        ("usage", None),
        ("CHUNK", None),
    ];

    for (kind, expected) in cases {
        assert_eq!(Envelope::new(kind, "c").into_event(), expected, "type {kind}");
    }
}

#[test]
fn envelope_without_content_defaults_to_empty() {
    let envelope: Envelope = serde_json::from_str(r#"{"type":"chunk"}"#).expect("envelope");
    assert_eq!(envelope.into_event(), Some(StreamEvent::Chunk(String::new())));
}

#[test]
fn envelope_tolerates_extra_fields() {
    let envelope: Envelope =
        serde_json::from_str(r#"{"type":"chunk","content":"x","id":7}"#).expect("envelope");
    assert_eq!(envelope, Envelope::new("chunk", "x"));
}

#[test]
fn history_roles_keep_unknown_values() {
    let history: HistoryResponse = serde_json::from_str(
        r#"{"messages":[{"role":"user","content":"q"},{"role":"tool","content":"r"}]}"#,
    )
    .expect("history");

    assert_eq!(history.messages[0].role, Role::User);
    assert_eq!(history.messages[1].role, Role::Other("tool".to_owned()));
    assert_eq!(
        serde_json::to_value(&history.messages[1]).expect("serialize"),
        json!({"role": "tool", "content": "r"})
    );
}

#[test]
fn empty_listing_bodies_default() {
    let threads: ThreadList = serde_json::from_str("{}").expect("threads");
    assert!(threads.threads.is_empty());
}

#[test]
fn endpoint_joins_paths_onto_base() {
    assert_eq!(
        endpoint("http://localhost:8000", &["chat"]).expect("url").as_str(),
        "http://localhost:8000/chat"
    );
    assert_eq!(
        endpoint("https://chat.example.com/api/", &["threads"])
            .expect("url")
            .as_str(),
        "https://chat.example.com/api/threads"
    );
    assert_eq!(
        endpoint("  ", &["chat"]).expect("url").as_str(),
        format!("{DEFAULT_BASE_URL}/chat")
    );
}

#[test]
fn endpoint_rejects_unparseable_base() {
    assert!(endpoint("not a url", &["chat"]).is_err());
}
