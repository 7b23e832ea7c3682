//! Common test utilities for integration tests.

#![allow(dead_code)]

use chzzk_bridge_client::{BridgeClient, BridgeError, ClientConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Channel id used throughout the tests.
pub fn test_channel() -> Uuid {
    Uuid::parse_str("6e0e5c6b-2f6b-4b1e-9c43-0c8a3f1d2e7a").unwrap()
}

/// Client pointed at a mock server, with short timeouts.
pub fn test_client(base_url: &str) -> BridgeClient {
    let config = ClientConfig::new(base_url)
        .with_connect_timeout(Duration::from_secs(2))
        .with_subscribe_timeout(Duration::from_secs(2))
        .with_unsubscribe_timeout(Duration::from_secs(2));
    BridgeClient::with_config(config).expect("client builds")
}

/// JSON payload of a chat message as the bridge sends it.
pub fn message_json(sender: &str, text: &str, pay_amount: u64) -> String {
    serde_json::json!({
        "channelId": "chan",
        "senderId": format!("{}-id", sender),
        "senderName": sender,
        "message": text,
        "messageTime": 1_700_000_000_000_i64,
        "payAmount": pay_amount,
    })
    .to_string()
}

/// One SSE frame carrying a chat message.
pub fn sse_frame(id: i64, sender: &str, text: &str) -> String {
    format!("id: {}\ndata: {}\n\n", id, message_json(sender, text, 0))
}

/// A heartbeat frame.
pub fn heartbeat() -> &'static str {
    "event: heartbeat\ndata: {}\n\n"
}

/// Error handler that records everything it receives.
pub fn recording_error_handler() -> (
    Arc<Mutex<Vec<BridgeError>>>,
    impl FnMut(BridgeError) + Send + 'static,
) {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    (errors, move |err| sink.lock().unwrap().push(err))
}
