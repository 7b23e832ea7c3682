//! chzzk-bridge-client - A client for the chzzk chat bridge
//!
//! The bridge exposes a channel's chat over HTTP and Server-Sent Events:
//!
//! - [`BridgeClient::subscribe`] registers interest in a channel, or yields the
//!   authorization path the user must visit first
//! - [`BridgeClient::session`] / [`BridgeClient::stream_events`] tail the
//!   channel's messages, resumable from the last delivered message id
//! - [`BridgeClient::unsubscribe`] tears the subscription down
//!
//! ```no_run
//! use chzzk_bridge_client::{BridgeClient, SubscriptionOutcome};
//! use uuid::Uuid;
//!
//! # async fn demo(channel: Uuid) -> chzzk_bridge_client::BridgeResult<()> {
//! let client = BridgeClient::new("http://localhost:8080")?;
//! if let SubscriptionOutcome::AuthRequired { path, .. } = client.subscribe(channel).await? {
//!     println!("authorize at {}", path);
//!     return Ok(());
//! }
//!
//! let session = client.session(channel, None);
//! let handle = session.handle();
//! tokio::spawn(async move {
//!     let _ = tokio::signal::ctrl_c().await;
//!     handle.close();
//! });
//! session.run(|message| println!("{}", message)).await
//! # }
//! ```

pub mod adapters;
pub mod cli;
mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
mod session;
pub mod sse;
pub mod traits;

pub use client::{BridgeClient, SSE_PATH, SUBSCRIBE_PATH, UNSUBSCRIBE_PATH};
pub use config::ClientConfig;
pub use error::{BridgeError, BridgeResult, StreamError};
pub use models::{ChatMessage, SubscriptionOutcome};
pub use session::{
    ConnectionState, ErrorHandler, SseHandle, StreamSession, EVENT_STREAM_CONTENT_TYPE,
    LAST_EVENT_ID_HEADER,
};
